//! Variable-length descriptor decoding shared by several VPD pages.
//!
//! Each decoder follows a layered structure:
//! - `layout`: byte offsets, ranges and masks (source of truth)
//! - `reader`: bounds-checked byte access
//! - `parser`: domain-level decoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! Decoders are pure and contain no I/O; the page decoders feed them slices
//! of an already fetched response.

pub mod designator;
pub mod transport_id;
