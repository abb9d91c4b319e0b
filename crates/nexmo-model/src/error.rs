use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("credentials field {0} is empty")]
    EmptyField(&'static str),
}
