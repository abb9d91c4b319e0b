mod balance;
pub use balance::BalanceSample;

mod credentials;
pub use credentials::Credentials;

mod state;
pub use state::ExporterState;
