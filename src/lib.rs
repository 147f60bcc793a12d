//! Rule-based conversational assistant for a yarn manufacturer's storefront.
//!
//! The pipeline is classic text matching, no trained models: lexical
//! normalization, entity extraction, intent classification, similarity
//! scoring against a static knowledge base, and context-aware response
//! composition. [`engine::Engine::answer_query`] is the single entry point.

pub mod compose;
pub mod context;
pub mod engine;
pub mod entities;
pub mod intent;
pub mod kb;
pub mod score;
pub mod text;

pub use compose::{RandomSource, SeededRandom, ThreadRandom};
pub use context::{ConversationContext, Preferences};
pub use engine::{Answer, Engine, IdentityTranslator, ProductCatalog, Translate};
pub use intent::{Intent, IntentResult};
pub use kb::KnowledgeBase;
pub use score::ScoreParams;
