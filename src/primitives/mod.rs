pub mod name_validation;
pub mod path_utils;
