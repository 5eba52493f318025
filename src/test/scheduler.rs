use crate::sim::{
    Event, FnEvent, Frame, ScheduleError, Scheduler, TickInterval, World,
};
use std::any::Any;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct DummyWorld {
    ticks: usize,
}

impl World for DummyWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_tick(&mut self, _sim: &mut Scheduler) {
        self.ticks = self.ticks.saturating_add(1);
    }
}

struct Push {
    id: u32,
    log: Arc<Mutex<Vec<u32>>>,
}

impl Event for Push {
    fn execute(self: Box<Self>, _sim: &mut Scheduler, _world: &mut dyn World) {
        let Push { id, log } = *self;
        log.lock().expect("log lock").push(id);
    }
}

fn push(id: u32, log: &Arc<Mutex<Vec<u32>>>) -> Push {
    Push {
        id,
        log: Arc::clone(log),
    }
}

#[test]
fn events_run_in_target_frame_order() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Scheduler::default();
    sim.schedule_after_frames(10.0, push(1, &log)).expect("schedule");
    sim.schedule_after_frames(5.0, push(2, &log)).expect("schedule");
    sim.schedule_after_frames(7.0, push(3, &log)).expect("schedule");

    let mut world = DummyWorld::default();
    sim.run_until(Frame(10), &mut world);

    assert_eq!(&*log.lock().expect("log lock"), &[2, 3, 1]);
    assert_eq!(world.ticks, 10);
    assert_eq!(sim.now(), Frame(10));
    assert_eq!(sim.executed(), 3);
    assert_eq!(sim.pending(), 0);
}

#[test]
fn tick_runs_only_events_whose_frame_has_arrived() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Scheduler::default();
    let id = sim.schedule_after_frames(3.0, push(1, &log)).expect("schedule");
    let mut world = DummyWorld::default();

    sim.tick(&mut world);
    sim.tick(&mut world);
    assert!(log.lock().expect("log lock").is_empty());
    assert_eq!(sim.remaining_frames(id), Some(1));

    sim.tick(&mut world);
    assert_eq!(&*log.lock().expect("log lock"), &[1]);
    assert_eq!(world.ticks, 3);
    assert_eq!(sim.remaining_frames(id), None);
}

#[test]
fn soft_cancelled_event_never_runs_but_stays_until_popped() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Scheduler::default();
    let id = sim.schedule_after_frames(4.0, push(1, &log)).expect("schedule");
    sim.schedule_after_frames(6.0, push(2, &log)).expect("schedule");

    assert!(sim.cancel(id));
    assert!(!sim.is_pending(id));
    assert_eq!(sim.remaining_frames(id), None);
    assert_eq!(sim.pending(), 2);

    let mut world = DummyWorld::default();
    sim.run_until(Frame(4), &mut world);
    assert_eq!(sim.pending(), 1);

    sim.run_until(Frame(6), &mut world);
    assert_eq!(&*log.lock().expect("log lock"), &[2]);
    assert_eq!(sim.executed(), 1);
}

#[test]
fn hard_remove_evicts_event_immediately() {
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut sim = Scheduler::default();
    let id = sim.schedule_after_frames(2.0, push(1, &log)).expect("schedule");
    assert!(sim.is_pending(id));

    assert!(sim.hard_remove(id));
    assert_eq!(sim.pending(), 0);
    assert!(!sim.is_pending(id));
    assert!(!sim.hard_remove(id));
    assert!(!sim.cancel(id));

    let mut world = DummyWorld::default();
    sim.run_until(Frame(5), &mut world);
    assert!(log.lock().expect("log lock").is_empty());
}

#[test]
fn invalid_frame_counts_are_rejected_without_a_handle() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut sim = Scheduler::default();

    assert_eq!(
        sim.schedule_after_frames(0.0, push(1, &log)),
        Err(ScheduleError::NonPositive(0.0))
    );
    assert_eq!(
        sim.schedule_after_frames(-3.0, push(2, &log)),
        Err(ScheduleError::NonPositive(-3.0))
    );
    assert!(matches!(
        sim.schedule_after_frames(f64::NAN, push(3, &log)),
        Err(ScheduleError::NonFinite(_))
    ));
    assert!(matches!(
        sim.schedule_after_frames(f64::INFINITY, push(4, &log)),
        Err(ScheduleError::NonFinite(_))
    ));
    assert!(matches!(
        sim.schedule_after_millis(0.0, push(5, &log)),
        Err(ScheduleError::NonPositive(_))
    ));
    assert_eq!(sim.pending(), 0);
}

#[test]
fn fractional_frame_counts_round_and_never_drop_below_one() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut sim = Scheduler::default();

    let tiny = sim.schedule_after_frames(0.2, push(1, &log)).expect("schedule");
    let up = sim.schedule_after_frames(2.6, push(2, &log)).expect("schedule");
    let down = sim.schedule_after_frames(2.4, push(3, &log)).expect("schedule");

    assert_eq!(sim.remaining_frames(tiny), Some(1));
    assert_eq!(sim.remaining_frames(up), Some(3));
    assert_eq!(sim.remaining_frames(down), Some(2));
}

#[test]
fn millisecond_and_second_requests_use_tick_interval() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut sim = Scheduler::new(TickInterval::from_millis(50));

    let ms = sim.schedule_after_millis(500.0, push(1, &log)).expect("schedule");
    let secs = sim.schedule_after_secs(1.0, push(2, &log)).expect("schedule");
    let short = sim.schedule_after_millis(10.0, push(3, &log)).expect("schedule");

    assert_eq!(sim.remaining_frames(ms), Some(10));
    assert_eq!(sim.remaining_frames(secs), Some(20));
    assert_eq!(sim.remaining_frames(short), Some(1));
}

#[test]
fn event_scheduled_for_current_frame_inside_event_runs_in_same_tick() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let inner = Arc::clone(&log);

    let mut sim = Scheduler::default();
    sim.schedule_at(
        Frame(1),
        FnEvent(move |sim: &mut Scheduler, _world: &mut dyn World| {
            inner.lock().expect("log lock").push(1);
            let now = sim.now();
            sim.schedule_at(now, push(2, &inner));
        }),
    );

    let mut world = DummyWorld::default();
    sim.tick(&mut world);

    assert_eq!(&*log.lock().expect("log lock"), &[1, 2]);
    assert_eq!(world.ticks, 1);
    assert_eq!(sim.now(), Frame(1));
}

#[test]
fn run_until_advances_frames_even_if_there_are_no_events() {
    let mut sim = Scheduler::default();
    let mut world = DummyWorld::default();

    sim.run_until(Frame(7), &mut world);
    assert_eq!(sim.now(), Frame(7));
    assert_eq!(world.ticks, 7);
    assert_eq!(sim.executed(), 0);
}
