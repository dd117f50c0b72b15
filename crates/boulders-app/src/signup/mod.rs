mod flow;

pub use flow::{SignupFlow, SignupFlowError};
