//! Per-context translation rules.
//!
//! A rule turns the addressing fields of one event kind into a
//! [`CallbackPlan`]. Rules are plain functions collected into a
//! [`ContextRules`] table once, when a dispatcher is built; bounded-context
//! behaviour is data, not a type hierarchy.

mod account_lookup;
mod fields;
mod quoting;
mod transfers;

use std::collections::HashMap;

use fspiop::{EntityCategory, HttpMethod};

pub use fields::{PayloadFields, required};

use crate::domain::context::BoundedContext;
use crate::domain::direction::Direction;
use crate::domain::error::TranslationError;
use crate::domain::error_mapping::ErrorTable;
use crate::domain::event::ProtocolHeaders;
use crate::domain::payload_gate::WireShape;
use crate::domain::ports::OperatorErrorSubject;

/// Body a plan sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedBody {
    /// No body (`GET`).
    Empty,
    /// The event payload mapped to a wire shape.
    Wire(WireShape),
}

/// Everything needed to address and shape one callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackPlan {
    /// Header direction.
    pub direction: Direction,
    /// Resource family.
    pub entity: EntityCategory,
    /// Path segments after the entity.
    pub segments: Vec<Option<String>>,
    /// Verb on the wire.
    pub method: HttpMethod,
    /// Verb declared for signing.
    pub signing_method: HttpMethod,
    /// Body to send.
    pub body: PlannedBody,
    /// Notification sent after this callback succeeds.
    pub follow_up: Option<Box<CallbackPlan>>,
}

impl CallbackPlan {
    /// Plan with no segments, no body and the wire verb as signing verb.
    pub fn new(direction: Direction, entity: EntityCategory, method: HttpMethod) -> Self {
        Self {
            direction,
            entity,
            segments: Vec::new(),
            method,
            signing_method: method,
            body: PlannedBody::Empty,
            follow_up: None,
        }
    }

    /// Append path segments.
    #[must_use]
    pub fn with_segments(mut self, segments: impl IntoIterator<Item = Option<String>>) -> Self {
        self.segments.extend(segments);
        self
    }

    /// Send the payload mapped to `shape`.
    #[must_use]
    pub fn with_body(mut self, shape: WireShape) -> Self {
        self.body = PlannedBody::Wire(shape);
        self
    }

    /// Declare `method` for signing instead of the wire verb.
    #[must_use]
    pub fn signed_as(mut self, method: HttpMethod) -> Self {
        self.signing_method = method;
        self
    }

    /// Chain a follow-up notification.
    #[must_use]
    pub fn then(mut self, follow_up: Self) -> Self {
        self.follow_up = Some(Box::new(follow_up));
        self
    }
}

/// Signature of a callback rule.
pub type TranslateFn = fn(&PayloadFields) -> Result<CallbackPlan, TranslationError>;

/// What a dispatcher does with an event kind.
#[derive(Debug, Clone, Copy)]
pub enum KindRule {
    /// Translate the event into a callback to `entity`.
    Callback {
        entity: EntityCategory,
        translate: TranslateFn,
    },
    /// Report the bounded-context error named by the kind.
    ErrorNotification,
}

/// Static kind table plus error table of one bounded context.
#[derive(Debug, Clone)]
pub struct ContextRules {
    context: BoundedContext,
    rules: HashMap<&'static str, KindRule>,
    errors: &'static ErrorTable,
    default_entity: EntityCategory,
}

impl ContextRules {
    /// Rules for `context`.
    pub fn for_context(context: BoundedContext) -> Self {
        let (callbacks, default_entity) = match context {
            BoundedContext::AccountLookup => (account_lookup::RULES, EntityCategory::Parties),
            BoundedContext::Quoting => (quoting::RULES, EntityCategory::Quotes),
            BoundedContext::Transfers => (transfers::RULES, EntityCategory::Transfers),
        };
        let errors = ErrorTable::for_context(context);
        let mut rules: HashMap<&'static str, KindRule> = errors
            .error_event_kinds()
            .map(|kind| (kind, KindRule::ErrorNotification))
            .collect();
        rules.extend(callbacks.iter().map(|(kind, entity, translate)| {
            (
                *kind,
                KindRule::Callback {
                    entity: *entity,
                    translate: *translate,
                },
            )
        }));
        Self {
            context,
            rules,
            errors,
            default_entity,
        }
    }

    /// Bounded context of the table.
    pub const fn context(&self) -> BoundedContext {
        self.context
    }

    /// Error table of the context.
    pub const fn errors(&self) -> &'static ErrorTable {
        self.errors
    }

    /// Rule registered for `kind`.
    pub fn rule(&self, kind: &str) -> Option<&KindRule> {
        self.rules.get(kind)
    }

    /// Registered kinds, in no particular order.
    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.keys().copied()
    }

    /// Resource an error callback about `kind` is addressed to.
    ///
    /// Callback kinds use their own entity; error-event kinds use the
    /// entity named by the inbound `content-type`, falling back to the
    /// context's primary resource.
    pub fn error_entity(&self, kind: &str, headers: &ProtocolHeaders) -> EntityCategory {
        match self.rule(kind) {
            Some(KindRule::Callback { entity, .. }) => *entity,
            _ => headers
                .content_type
                .as_deref()
                .and_then(EntityCategory::from_content_type)
                .unwrap_or(self.default_entity),
        }
    }

    /// Operator-error subject identifying the entity in `fields`.
    pub fn operator_subject(&self, fields: &PayloadFields) -> OperatorErrorSubject {
        match self.context {
            BoundedContext::AccountLookup => OperatorErrorSubject::AccountLookup {
                party_type: fields.party_type.clone(),
                party_id: fields.party_id.clone(),
                party_sub_type: fields.party_sub_type.clone(),
            },
            BoundedContext::Quoting => OperatorErrorSubject::Quoting {
                quote_id: fields.quote_id.clone(),
                bulk_quote_id: fields.bulk_quote_id.clone(),
            },
            BoundedContext::Transfers => OperatorErrorSubject::Transfers {
                transfer_id: fields.transfer_id.clone(),
                bulk_transfer_id: fields.bulk_transfer_id.clone(),
            },
        }
    }
}

/// Table row: kind, resource and rule.
type RuleRow = (&'static str, EntityCategory, TranslateFn);
