//! Meal AI Common Library
//!
//! CLIとWeb(WASM)で共有される型とユーティリティ

pub mod types;
pub mod error;
pub mod normalizer;
pub mod nutrition;
pub mod upload;
pub mod state;
pub mod auth;

pub use types::{
    AnalysisOutput, CanonicalResponse, Envelope, EnvelopeEntry, EnvelopeResponse,
    FlatNutritionRecord, FoodItem, Totals,
};
pub use error::{Error, ErrorCategory, Result, ValidationError};
pub use normalizer::{classify, normalize, PayloadShape};
pub use nutrition::{fallback_record, EnvelopeView, FlatView, Macro, STUB_MENU};
pub use upload::{
    decode_payload, validate_upload, UploadController, UploadObserver, UploadOutcome,
    UploadSource, WebhookReply, WebhookTransport, MAX_UPLOAD_BYTES, WEBHOOK_URL,
};
pub use state::{AnalysisSession, RequestTicket, Screen};
pub use auth::{AuthGate, AuthStatus, IdentityProvider, OAuthProvider, Subscription};
