//! Core console types.
//!
//! This module provides the building blocks:
//! - [`Console`] - Dispatcher and login state machine
//! - [`ConsoleCommand`] - Named commands with handlers
//! - [`CommandRegistry`] - Name-ordered command table
//! - [`tokenize`] - Quote-aware command tokenizer
//! - [`DisplaySurface`] / [`InputSurface`] - What front ends implement
//! - Messages for communication between layers

mod command;
mod console;
mod error;
mod events;
mod registry;
mod session;
mod surface;
mod tokenizer;

pub use command::{CommandArgs, CommandHandler, ConsoleCommand, DEFAULT_DESCRIPTION};
pub use console::{Console, HELP_COMMAND, NO_COMMANDS};
pub use error::{CommandResult, ConsoleError, INCORRECT_CREDENTIALS, LOGIN_ABORTED};
pub use events::{
    ConsoleClearEvent, ConsoleEditEvent, ConsoleEventsPlugin, ConsoleInputEvent,
    ConsoleOutputEvent, ConsoleSubmitEvent,
};
pub use registry::CommandRegistry;
pub use session::{
    CredentialCheck, Credentials, LoginStage, LoginStatus, Session, PASSWORD_PROMPT,
    USERNAME_PROMPT,
};
pub use surface::{DisplayOp, DisplaySurface, InputEdit, InputLine, InputSurface, OutputBuffer};
pub use tokenizer::{tokenize, tokenize_args, TokenizedCommand};
