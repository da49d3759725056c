//! Abstract syntax tree for Glyph modules.
//!
//! A Glyph source file parses into a [`Module`]: a flat, ordered sequence of
//! top-level [`Item`]s (type definitions, routes, functions, providers,
//! imports, ...). Every category is a closed enum so that walks over the
//! tree are exhaustive by construction:
//! - [`Item`] - top-level declarations
//! - [`Type`] - type annotations (recursive)
//! - [`Statement`] / [`Expr`] / [`Literal`] - handler bodies
//!
//! This crate is pure data: no parsing, no validation, no I/O.

mod expr;
mod item;
mod types;


pub use expr::{BinOp, Expr, Literal, Statement, UnOp};
pub use item::{
    AuthConfig, Command, CommandParam, ConstDecl, CronTask, EventHandler, Field, Function,
    HttpMethod, ImportName, ImportStatement, Injection, Item, Module, ModuleDecl, Param,
    ProviderDef, ProviderMethod, QueueWorker, RateLimit, Route, TypeDef, WebSocketEvent,
    WebSocketRoute, WsEventKind,
};
pub use types::Type;
