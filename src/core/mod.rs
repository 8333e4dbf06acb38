pub mod clock;
pub mod notifier;
pub mod store;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use notifier::{ChangeEvent, ChangeListener, ChangeNotifier, Scope, Subscription};
pub use store::{StoreSettings, TaskTimerStore};
pub use timer::{TimerState, Transition};
