pub mod assertions;
pub mod generators;
