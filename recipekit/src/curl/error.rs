use thiserror::Error;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum CurlError {
    #[error("Flag '{flag}' expects an argument but the command ended.")]
    MissingArgument { flag: String },
}
