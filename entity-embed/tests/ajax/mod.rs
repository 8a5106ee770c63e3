//! Save command wire format

mod save_command;
