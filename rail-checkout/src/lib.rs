pub mod lifecycle;
pub mod release;
pub mod orchestrator;
pub mod session;

pub use lifecycle::{CheckoutState, LifecycleError};
pub use release::ReleaseDispatcher;
pub use orchestrator::{ConfirmationFailure, ConfirmationOrchestrator, MockBookingService};
pub use session::{CheckoutSession, ExitPath, PaymentLatch, PaymentOutcome};
