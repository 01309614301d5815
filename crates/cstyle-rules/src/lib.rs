//! # cstyle-rules
//!
//! Built-in style rules for cstyle.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | CS001 | `include-order` | Consecutive `#include` lines are sorted |
//! | CS002 | `brace-placement` | Block-opening braces sit on their own line |
//! | CS003 | `keyword-paren-spacing` | `if ( cond )` spacing for control keywords |
//! | CS004 | `binary-operator-spacing` | One space around binary operators |
//! | CS005 | `member-access-spacing` | No spaces around `.` and `->` |
//! | CS006 | `template-declaration-break` | No blank line after `template <...>` |
//! | CS007 | `indentation` | Space indentation matching the block depth |
//!
//! ## Usage
//!
//! ```ignore
//! use cstyle_core::Engine;
//! use cstyle_rules::{BracePlacement, Indentation};
//!
//! let engine = Engine::builder()
//!     .rule(BracePlacement::new())
//!     .rule(Indentation::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod binary_operator_spacing;
mod brace_placement;
mod include_order;
mod indentation;
mod keyword_paren_spacing;
mod member_access;
mod presets;
mod template_break;

pub use binary_operator_spacing::BinaryOperatorSpacing;
pub use brace_placement::BracePlacement;
pub use include_order::IncludeOrder;
pub use indentation::Indentation;
pub use keyword_paren_spacing::KeywordParenSpacing;
pub use member_access::MemberAccessSpacing;
pub use presets::{all_rules, find_rule, layout_rules, Preset};
pub use template_break::TemplateDeclarationBreak;

/// Re-export core types for convenience.
pub use cstyle_core::{Diagnostic, Rule, Severity};
