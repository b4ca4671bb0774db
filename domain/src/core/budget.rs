//! Context budget constants.
//!
//! Token budgets are approximated as characters (4 characters per token),
//! tuned so that no single evidence entry can starve the model's context
//! window. A tokenizer-based budget could replace these without changing
//! any call site.

/// Heuristic character width of one token.
pub const APPROX_CHARS_PER_TOKEN: usize = 4;

/// Per-entry token ceiling for evidence previews and synthesis input.
pub const EVIDENCE_ENTRY_TOKENS: usize = 3_000;

/// Per-entry character ceiling for evidence previews and synthesis input.
pub const EVIDENCE_ENTRY_CHARS: usize = EVIDENCE_ENTRY_TOKENS * APPROX_CHARS_PER_TOKEN;

/// Maximum array length inside an evidence preview before truncation.
pub const EVIDENCE_ARRAY_MAX_ITEMS: usize = 20;

/// Character ceiling for a tool-result transcript message.
pub const TOOL_RESULT_TRANSCRIPT_CHARS: usize = 2_000;

/// Character ceiling for each named `{{output_key}}` placeholder in a
/// pipeline synthesis template.
pub const NAMED_PLACEHOLDER_CHARS: usize = 8_000;

/// Character ceiling for each entry of the combined `{{skill_outputs}}`
/// block. Tighter than the named budget because the catch-all block
/// carries every step at once.
pub const COMBINED_BLOCK_ENTRY_CHARS: usize = 6_000;

/// Serialized-size ceiling for a ledger evidence payload. Payloads at or
/// under this size are stored verbatim.
pub const LEDGER_PAYLOAD_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Maximum embedded record-list length once a ledger evidence payload
/// exceeds [`LEDGER_PAYLOAD_MAX_BYTES`].
pub const LEDGER_ARRAY_MAX_ITEMS: usize = 500;
