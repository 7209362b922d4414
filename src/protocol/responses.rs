//! DICT response codes
//!
//! The subset of RFC 2229 status codes the client acts on.

/// n databases present
pub const DATABASES_PRESENT: u16 = 110;
/// n strategies available
pub const STRATEGIES_AVAILABLE: u16 = 111;
/// database information follows
pub const DATABASE_INFO: u16 = 112;
/// n definitions retrieved
pub const DEFINITIONS_RETRIEVED: u16 = 150;
/// word database name, one definition follows
pub const DEFINITION_FOLLOWS: u16 = 151;
/// n matches found
pub const MATCHES_FOUND: u16 = 152;
/// text capabilities msg-id
pub const SERVICE_READY: u16 = 220;
pub const OK: u16 = 250;
pub const INVALID_DATABASE: u16 = 550;
pub const INVALID_STRATEGY: u16 = 551;
pub const NO_MATCH: u16 = 552;
pub const NO_DATABASES: u16 = 554;
pub const NO_STRATEGIES: u16 = 555;

/// A line holding only this ends a multi-line body.
pub const TERMINATOR: &str = ".";

/// Line ending used when framing commands.
pub const LINE_ENDING: &str = "\r\n";
