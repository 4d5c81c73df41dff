//! Field precedence resolution
//!
//! A v1 entity can carry the same concept twice: once in a legacy encoding
//! (`currentHelper`/`helperAttributes`, `preRequestScript`/`tests`) and once in
//! a modern one (`auth`, `events`). Which one wins is decided by a single
//! table keyed on the presence of each encoding and the `prioritizeV2` flag.
//!
//! Copyright (c) 2025 Coltrans Team
//! Licensed under the Apache-2.0 license

pub mod auth;
pub mod description;
pub mod events;

pub use auth::{auth_from_v1, auth_to_v1, is_noauth};
pub use description::DescriptionPolicy;
pub use events::{events_from_v1, events_to_v1};

/// How much of an encoding an entity carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Nothing at all
    Absent,
    /// The field is declared but carries no usable value. A declared legacy
    /// field still claims precedence, which suppresses the output.
    Declared,
    /// A value that can be converted
    Usable,
}

/// Which encoding supplies the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Legacy,
    Modern,
    Omit,
}

/// Decide between the legacy and modern encodings of one concept
///
/// | prioritize_v2 | legacy   | modern | result |
/// |---------------|----------|--------|--------|
/// | false         | Usable   | any    | Legacy |
/// | false         | Declared | any    | Omit   |
/// | false         | Absent   | Usable | Modern |
/// | true          | any      | Usable | Modern |
/// | true          | Usable   | other  | Legacy |
/// | otherwise     |          |        | Omit   |
pub fn resolve(legacy: Presence, modern: Presence, prioritize_v2: bool) -> Resolution {
    use Presence::*;

    let resolution = match (prioritize_v2, legacy, modern) {
        (false, Usable, _) => Resolution::Legacy,
        (false, Declared, _) => Resolution::Omit,
        (false, Absent, Usable) => Resolution::Modern,
        (true, _, Usable) => Resolution::Modern,
        (true, Usable, _) => Resolution::Legacy,
        _ => Resolution::Omit,
    };

    log::trace!(
        "precedence: legacy={:?} modern={:?} prioritize_v2={} -> {:?}",
        legacy,
        modern,
        prioritize_v2,
        resolution
    );
    resolution
}
