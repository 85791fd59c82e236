//
// lib.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
//
//

pub mod bulk_user_info;
pub mod data_frame;
pub mod error;
pub mod file;
pub mod file_operation;
pub mod file_type;
pub mod matrix_data;
pub mod pairlist;
pub mod primitive_value;
pub mod project;
pub mod session_command;
pub mod session_error;
pub mod session_image;
pub mod session_response;
pub mod user;
pub mod variable;
pub mod variable_type;
pub mod wire;
pub mod workspace;

pub use error::Error;
pub type Result<T> = std::result::Result<T, error::Error>;
