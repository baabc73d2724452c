pub mod errors;
pub mod notify;
pub mod remote;
pub mod session;
pub mod store;

pub use errors::{ClientError, ClientResult};
pub use notify::{Notification, Notifier, Severity};
pub use remote::RemoteTaskService;
pub use session::EditSession;
pub use store::{EmptyState, LoadPhase, Snapshot, TaskStore};
