//! Flutter bridge surface for the Menuboard core.

pub mod api;
