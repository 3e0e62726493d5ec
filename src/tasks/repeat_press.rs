//! Press-and-hold repeat driver

use std::{
    fmt,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use tracing::{debug, info, warn};

/// Delay before a held control starts repeating
pub const DEFAULT_REPEAT_DELAY: Duration = Duration::from_millis(500);
/// Period between repeats while a control is held
pub const DEFAULT_REPEAT_INTERVAL: Duration = Duration::from_millis(100);

/// Step performed on press and on every repeat
pub type StepAction = Arc<dyn Fn() + Send + Sync>;

/// When repeats start after the first, immediate, invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatPolicy {
    /// Repeat every `interval`, starting one interval after the press
    Immediate { interval: Duration },
    /// Wait `delay`, then repeat every `interval`
    Delayed { delay: Duration, interval: Duration },
}

impl RepeatPolicy {
    pub fn immediate() -> Self {
        RepeatPolicy::Immediate {
            interval: DEFAULT_REPEAT_INTERVAL,
        }
    }

    pub fn delayed() -> Self {
        RepeatPolicy::Delayed {
            delay: DEFAULT_REPEAT_DELAY,
            interval: DEFAULT_REPEAT_INTERVAL,
        }
    }

    pub fn initial_delay(&self) -> Option<Duration> {
        match self {
            RepeatPolicy::Immediate { .. } => None,
            RepeatPolicy::Delayed { delay, .. } => Some(*delay),
        }
    }

    pub fn interval(&self) -> Duration {
        match self {
            RepeatPolicy::Immediate { interval } | RepeatPolicy::Delayed { interval, .. } => {
                *interval
            }
        }
    }
}

impl Default for RepeatPolicy {
    fn default() -> Self {
        Self::delayed()
    }
}

/// Where a controller is in its press gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressPhase {
    Idle,
    WaitingDelay,
    Repeating,
}

/// Repeat schedule of one press, shared by the controller and the timer task
struct RepeatGate {
    /// `true` while the press is held
    live: bool,
    next_due: Instant,
    period: Duration,
}

impl RepeatGate {
    /// Run `action` if the press is held and the next repeat is due at `now`.
    fn fire_due(&mut self, now: Instant, action: &StepAction) -> bool {
        if !self.live || now < self.next_due {
            return false;
        }
        action();
        self.next_due += self.period;
        // A stalled scheduler resumes the cadence instead of bursting
        if self.next_due <= now {
            self.next_due = now + self.period;
        }
        true
    }
}

/// Timer resources of one press gesture.
///
/// Dropping the session closes its gate and aborts the timer task, so a
/// session can never keep firing once it is gone.
struct PressSession {
    /// Every step runs while holding this lock
    gate: Arc<Mutex<RepeatGate>>,
    action: StepAction,
    task: JoinHandle<()>,
}

impl PressSession {
    /// End the press at `now`. A repeat due exactly at release still fires.
    fn release(self, now: Instant) {
        let mut gate = lock_gate(&self.gate);
        gate.fire_due(now, &self.action);
        gate.live = false;
    }
}

impl Drop for PressSession {
    fn drop(&mut self) {
        lock_gate(&self.gate).live = false;
        self.task.abort();
    }
}

fn lock_gate(gate: &Mutex<RepeatGate>) -> std::sync::MutexGuard<'_, RepeatGate> {
    gate.lock().unwrap_or_else(|e| e.into_inner())
}

/// Turns press/release pairs into a timed sequence of step invocations.
///
/// One controller per control; it is reused across presses. Must be used
/// from within a Tokio runtime.
pub struct RepeatPressController {
    name: String,
    policy: RepeatPolicy,
    session: Option<PressSession>,
    phase_tx: Arc<watch::Sender<PressPhase>>,
}

impl RepeatPressController {
    pub fn new(name: impl Into<String>, policy: RepeatPolicy) -> Self {
        let (phase_tx, _) = watch::channel(PressPhase::Idle);
        Self {
            name: name.into(),
            policy,
            session: None,
            phase_tx: Arc::new(phase_tx),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> RepeatPolicy {
        self.policy
    }

    pub fn phase(&self) -> PressPhase {
        *self.phase_tx.borrow()
    }

    /// Watch phase changes, including the delay elapsing
    pub fn subscribe_phase(&self) -> watch::Receiver<PressPhase> {
        self.phase_tx.subscribe()
    }

    pub fn is_pressed(&self) -> bool {
        self.session.is_some()
    }

    /// Fire `action` once right away, then keep firing it per the policy
    /// until [`Self::on_press_end`].
    pub fn on_press_start(&mut self, action: StepAction) {
        if self.session.is_some() {
            warn!(
                "{}: press started while already pressed, dropping previous session",
                self.name
            );
            self.on_press_end();
        }

        let pressed_at = Instant::now();
        action();

        let phase = if self.policy.initial_delay().is_some() {
            PressPhase::WaitingDelay
        } else {
            PressPhase::Repeating
        };
        self.phase_tx.send_replace(phase);
        info!("{}: pressed ({:?})", self.name, phase);

        // A zero period would spin the timer task
        let period = self.policy.interval().max(Duration::from_millis(1));
        let first_due = pressed_at + self.policy.initial_delay().unwrap_or_default() + period;
        let gate = Arc::new(Mutex::new(RepeatGate {
            live: true,
            next_due: first_due,
            period,
        }));
        let task = tokio::spawn(repeat_press_task(
            self.name.clone(),
            self.policy,
            pressed_at,
            Arc::clone(&action),
            Arc::clone(&gate),
            Arc::clone(&self.phase_tx),
        ));

        self.session = Some(PressSession { gate, action, task });
    }

    /// Cancel the pending delay and the repeat interval. A repeat falling due
    /// at the instant of release still fires; no step runs after this
    /// returns. Does nothing when not pressed.
    pub fn on_press_end(&mut self) {
        if let Some(session) = self.session.take() {
            session.release(Instant::now());
            self.phase_tx.send_replace(PressPhase::Idle);
            info!("{}: released", self.name);
        }
    }
}

impl fmt::Debug for RepeatPressController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepeatPressController")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .field("phase", &self.phase())
            .finish()
    }
}

/// Timer task backing a press session: optional delay, then a fixed-period
/// repeat until the gate closes or the task is aborted.
async fn repeat_press_task(
    name: String,
    policy: RepeatPolicy,
    pressed_at: Instant,
    action: StepAction,
    gate: Arc<Mutex<RepeatGate>>,
    phase_tx: Arc<watch::Sender<PressPhase>>,
) {
    if let Some(delay) = policy.initial_delay() {
        sleep_until(pressed_at + delay).await;

        {
            let held = lock_gate(&gate);
            if !held.live {
                return;
            }
            phase_tx.send_replace(PressPhase::Repeating);
        }
        debug!("{}: repeat delay elapsed", name);
    }

    loop {
        let next_due = {
            let held = lock_gate(&gate);
            if !held.live {
                break;
            }
            held.next_due
        };
        sleep_until(next_due).await;

        if lock_gate(&gate).fire_due(Instant::now(), &action) {
            debug!("{}: repeat", name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    use crate::state::{Height, Pace, PanelState, Step};

    /// Action that counts its invocations and records when they happened
    fn recorder() -> (StepAction, Arc<Mutex<Vec<Duration>>>) {
        let origin = Instant::now();
        let fired = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&fired);
        let action: StepAction = Arc::new(move || {
            log.lock().unwrap().push(origin.elapsed());
        });
        (action, fired)
    }

    fn counter() -> (StepAction, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let hits = Arc::clone(&count);
        let action: StepAction = Arc::new(move || {
            hits.fetch_add(1, Ordering::SeqCst);
        });
        (action, count)
    }

    fn millis(values: &[u64]) -> Vec<Duration> {
        values.iter().map(|&ms| Duration::from_millis(ms)).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn press_fires_once_synchronously() {
        let mut controller = RepeatPressController::new("test", RepeatPolicy::delayed());
        let (action, count) = counter();

        controller.on_press_start(action);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        controller.on_press_end();
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_repeat_held_through_one_second() {
        let mut controller = RepeatPressController::new("test", RepeatPolicy::delayed());
        let (action, fired) = recorder();

        controller.on_press_start(action);
        sleep(Duration::from_millis(1050)).await;
        controller.on_press_end();

        assert_eq!(*fired.lock().unwrap(), millis(&[0, 600, 700, 800, 900, 1000]));
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_release_on_a_tick_counts_that_tick() {
        let mut controller = RepeatPressController::new("test", RepeatPolicy::delayed());
        let (action, fired) = recorder();

        controller.on_press_start(action);
        sleep(Duration::from_millis(1000)).await;
        controller.on_press_end();

        sleep(Duration::from_secs(2)).await;
        assert_eq!(*fired.lock().unwrap(), millis(&[0, 600, 700, 800, 900, 1000]));
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_release_on_a_tick_counts_that_tick() {
        let mut controller = RepeatPressController::new("test", RepeatPolicy::immediate());
        let (action, fired) = recorder();

        controller.on_press_start(action);
        sleep(Duration::from_millis(300)).await;
        controller.on_press_end();

        sleep(Duration::from_secs(2)).await;
        assert_eq!(*fired.lock().unwrap(), millis(&[0, 100, 200, 300]));
    }

    #[tokio::test(start_paused = true)]
    async fn release_on_the_delay_deadline_does_not_repeat() {
        let mut controller = RepeatPressController::new("test", RepeatPolicy::delayed());
        let (action, count) = counter();

        controller.on_press_start(action);
        sleep(Duration::from_millis(500)).await;
        controller.on_press_end();

        sleep(Duration::from_secs(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn release_before_delay_fires_only_once() {
        let mut controller = RepeatPressController::new("test", RepeatPolicy::delayed());
        let (action, count) = counter();

        controller.on_press_start(action);
        sleep(Duration::from_millis(300)).await;
        controller.on_press_end();

        sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_repeat_has_no_delay() {
        let mut controller = RepeatPressController::new("test", RepeatPolicy::immediate());
        let (action, fired) = recorder();

        controller.on_press_start(action);
        sleep(Duration::from_millis(350)).await;
        controller.on_press_end();

        sleep(Duration::from_secs(1)).await;
        assert_eq!(*fired.lock().unwrap(), millis(&[0, 100, 200, 300]));
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_fires_after_release() {
        let mut controller = RepeatPressController::new("test", RepeatPolicy::immediate());
        let (action, count) = counter();

        controller.on_press_start(action);
        sleep(Duration::from_millis(550)).await;
        controller.on_press_end();
        let at_release = count.load(Ordering::SeqCst);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(at_release, 6);
        assert_eq!(count.load(Ordering::SeqCst), at_release);
    }

    #[tokio::test(start_paused = true)]
    async fn release_when_idle_is_a_no_op() {
        let mut controller = RepeatPressController::new("test", RepeatPolicy::delayed());
        controller.on_press_end();
        controller.on_press_end();
        assert_eq!(controller.phase(), PressPhase::Idle);
        assert!(!controller.is_pressed());
    }

    #[tokio::test(start_paused = true)]
    async fn phase_follows_the_gesture() {
        let mut controller = RepeatPressController::new("test", RepeatPolicy::delayed());
        let (action, _) = counter();
        assert_eq!(controller.phase(), PressPhase::Idle);

        controller.on_press_start(action);
        assert_eq!(controller.phase(), PressPhase::WaitingDelay);

        sleep(Duration::from_millis(550)).await;
        assert_eq!(controller.phase(), PressPhase::Repeating);

        controller.on_press_end();
        assert_eq!(controller.phase(), PressPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_policy_starts_repeating() {
        let mut controller = RepeatPressController::new("test", RepeatPolicy::immediate());
        let (action, _) = counter();

        controller.on_press_start(action);
        assert_eq!(controller.phase(), PressPhase::Repeating);
        controller.on_press_end();
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_cycles_leave_no_running_timers() {
        let mut controller = RepeatPressController::new("test", RepeatPolicy::delayed());
        let (action, count) = counter();

        for _ in 0..20 {
            controller.on_press_start(Arc::clone(&action));
            sleep(Duration::from_millis(50)).await;
            controller.on_press_end();
            assert!(!controller.is_pressed());
        }

        sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 20);
        assert_eq!(controller.phase(), PressPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn second_press_replaces_the_first_session() {
        let mut controller = RepeatPressController::new("test", RepeatPolicy::delayed());
        let (action, count) = counter();

        controller.on_press_start(Arc::clone(&action));
        controller.on_press_start(action);
        sleep(Duration::from_millis(1050)).await;
        controller.on_press_end();

        sleep(Duration::from_secs(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_controller_cancels_the_session() {
        let (action, count) = counter();
        {
            let mut controller = RepeatPressController::new("test", RepeatPolicy::immediate());
            controller.on_press_start(action);
            sleep(Duration::from_millis(150)).await;
        }

        sleep(Duration::from_secs(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_durations_are_honored() {
        let policy = RepeatPolicy::Delayed {
            delay: Duration::from_millis(200),
            interval: Duration::from_millis(50),
        };
        let mut controller = RepeatPressController::new("test", policy);
        let (action, fired) = recorder();

        controller.on_press_start(action);
        sleep(Duration::from_millis(360)).await;
        controller.on_press_end();

        assert_eq!(*fired.lock().unwrap(), millis(&[0, 250, 300, 350]));
    }

    #[tokio::test(start_paused = true)]
    async fn held_stepper_accumulates_on_the_panel() {
        let panel = Arc::new(PanelState::new(Pace::new(5, 58), Height::new(170)));
        let mut controller = RepeatPressController::new("pace+", RepeatPolicy::delayed());

        let target = Arc::clone(&panel);
        controller.on_press_start(Arc::new(move || {
            target.step_pace(Step::Increment).unwrap();
        }));
        sleep(Duration::from_millis(1050)).await;
        controller.on_press_end();

        assert_eq!(panel.get_snapshot().unwrap().pace, Pace::new(6, 4));
    }
}
