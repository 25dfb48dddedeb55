pub mod batch;
pub mod import;
pub mod store;
pub mod users;
pub mod view;

pub use batch::{BatchOperation, BatchRunner};
pub use import::{ImportOutcome, ImportPipeline};
pub use store::RecordStore;
pub use users::UserService;
