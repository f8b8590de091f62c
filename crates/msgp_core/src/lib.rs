//! MessagePack-compatible binary object codec with typed and dynamic decoding.

/// Tag grammar, wire primitives, typed marshal/unmarshal, and record schemas.
pub mod codec;
