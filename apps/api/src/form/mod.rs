// Form completion core (record, evaluator, progress) plus the hosting-form
// pieces around it: session events, attachment checks, submit-time validation.
// The core is pure and synchronous; only the handlers touch the network.

pub mod attachment;
pub mod evaluator;
pub mod handlers;
pub mod progress;
pub mod record;
pub mod session;
pub mod validation;
