//! Routes engine events to the notification dispatcher

use tokio::sync::broadcast::{error::RecvError, Receiver};
use tracing::{debug, info, warn};

use crate::{countdown::CountdownEvent, services::NotificationDispatcher};

/// Background task that consumes engine events until the channel closes.
///
/// Subscribe before the countdown starts so no early event is missed.
pub async fn notification_dispatch_task(
    mut events: Receiver<CountdownEvent>,
    mut dispatcher: Box<dyn NotificationDispatcher>,
) {
    info!("Starting notification dispatch task");

    loop {
        match events.recv().await {
            Ok(event) => dispatch_event(dispatcher.as_mut(), &event).await,
            Err(RecvError::Lagged(skipped)) => {
                warn!("Notification dispatch lagged, {} event(s) dropped", skipped);
            }
            Err(RecvError::Closed) => {
                debug!("Event channel closed");
                break;
            }
        }
    }

    info!("Notification dispatch task exited");
}

/// Forward one event to the dispatcher.
///
/// The workday-ended notification is raised from the state update that lands
/// exactly on the end time. Nothing replays it: if no tick falls in that
/// wall-clock second, the notification is not shown that day.
pub async fn dispatch_event(dispatcher: &mut dyn NotificationDispatcher, event: &CountdownEvent) {
    match event {
        CountdownEvent::StateUpdated(state) => {
            if state.is_workday_over() && !state.is_overtime() {
                dispatcher.show_workday_ended().await;
            }
        }
        CountdownEvent::Hourly { time_remaining } => {
            dispatcher.show_hourly(*time_remaining).await;
        }
        CountdownEvent::Milestone(milestone) => {
            dispatcher.show_milestone(milestone.message()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
    use tokio::sync::broadcast;

    use crate::{
        countdown::{CountdownEngine, CountdownState, ManualClock, Milestone},
        state::Settings,
    };

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    #[async_trait]
    impl NotificationDispatcher for Recorder {
        async fn show_hourly(&mut self, time_remaining: TimeDelta) {
            self.calls.push(format!("hourly:{}", time_remaining.num_hours()));
        }

        async fn show_milestone(&mut self, message: &str) {
            self.calls.push(format!("milestone:{}", message));
        }

        async fn show_workday_ended(&mut self) {
            self.calls.push("ended".to_string());
        }
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 14)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn routes_each_event_kind() {
        let mut recorder = Recorder::default();
        let events = [
            CountdownEvent::StateUpdated(CountdownState::new(at(16, 0), at(17, 0))),
            CountdownEvent::Hourly { time_remaining: TimeDelta::hours(2) },
            CountdownEvent::Milestone(Milestone::FifteenMinutesLeft),
            CountdownEvent::StateUpdated(CountdownState::new(at(17, 0), at(17, 0))),
            CountdownEvent::StateUpdated(CountdownState::new(at(17, 1), at(17, 0))),
        ];
        for event in &events {
            dispatch_event(&mut recorder, event).await;
        }

        assert_eq!(
            recorder.calls,
            vec![
                "hourly:2".to_string(),
                "milestone:Only 15 minutes to go! 🏁".to_string(),
                "ended".to_string(),
            ]
        );
    }

    async fn ended_calls(ticks: &[NaiveDateTime]) -> usize {
        let clock = ManualClock::new(ticks[0]);
        let settings = Settings {
            enable_hourly_notifications: false,
            enable_milestone_notifications: false,
            ..Settings::default()
        };
        let mut engine = CountdownEngine::new(settings, Box::new(clock.clone()));
        let mut recorder = Recorder::default();

        for &tick in ticks {
            clock.set(tick);
            for event in engine.tick() {
                dispatch_event(&mut recorder, &event).await;
            }
        }
        recorder.calls.iter().filter(|c| *c == "ended").count()
    }

    #[tokio::test]
    async fn workday_ended_needs_a_tick_on_the_end_second() {
        let on_time = [at(16, 59) + TimeDelta::seconds(59), at(17, 0), at(17, 0) + TimeDelta::seconds(1)];
        assert_eq!(ended_calls(&on_time).await, 1);

        // Skipping 17:00:00 (a late or missed tick) loses the notification.
        let skipped = [at(16, 59) + TimeDelta::seconds(59), at(17, 0) + TimeDelta::seconds(1)];
        assert_eq!(ended_calls(&skipped).await, 0);
    }

    #[tokio::test]
    async fn task_exits_when_channel_closes() {
        let (tx, rx) = broadcast::channel(8);
        let handle = tokio::spawn(notification_dispatch_task(rx, Box::new(Recorder::default())));

        tx.send(CountdownEvent::Milestone(Milestone::Halfway)).unwrap();
        drop(tx);

        handle.await.unwrap();
    }
}
