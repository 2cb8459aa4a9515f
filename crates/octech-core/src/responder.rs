//! Scripted FAQ responder.
//!
//! Maps one line of user text to a canned reply by keyword containment.
//! Rules are tried in a fixed order and the first match wins; the last rule
//! always matches, so the responder cannot fail.

use octech_schema::ConversationState;

pub const GREETING: &str = "Hello! How can I help you with your IT needs today?";
pub const CONTACT_ACK: &str =
    "Thank you for providing your information. How can we assist you with your IT needs?";
pub const HANDOFF_OFFER: &str = "It seems like you need specialized assistance. Would you like to connect with a live support agent?";
pub const PRICING: &str = "Our pricing varies based on the specific service. Would you like to book a free consultation for a personalized quote?";
pub const BOOKING: &str = "You can book an appointment by clicking the 'Book an Appointment' button on our website. Would you like me to guide you through the process?";
pub const SERVICES: &str = "We offer a range of IT services including network setup, computer repair, security camera installation, and Wi-Fi optimization. Which service are you interested in?";
pub const CONTACT_DETAILS: &str = "You can reach us at (949) 555-1234 or email us at support@octechsupport.com. Would you like me to have someone contact you directly?";
pub const ASK_CONTACT_INFO: &str =
    "Thanks for your message. To better assist you, could you please provide your name and email?";
pub const HANDOFF_CONNECTING: &str =
    "Connecting you with a live support agent. Please wait a moment...";
pub const HANDOFF_CONNECTED: &str = "Live agent connected. How can I help you today?";
pub const HANDOFF_DECLINED: &str =
    "No problem. I'll continue to assist you here. What questions do you have?";

/// Canned reply categories, in match priority order after the contact-info check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    ContactAcknowledged,
    HandoffOffer,
    Pricing,
    Booking,
    Services,
    ContactDetails,
    AskContactInfo,
}

impl ReplyKind {
    pub fn text(&self) -> &'static str {
        match self {
            ReplyKind::ContactAcknowledged => CONTACT_ACK,
            ReplyKind::HandoffOffer => HANDOFF_OFFER,
            ReplyKind::Pricing => PRICING,
            ReplyKind::Booking => BOOKING,
            ReplyKind::Services => SERVICES,
            ReplyKind::ContactDetails => CONTACT_DETAILS,
            ReplyKind::AskContactInfo => ASK_CONTACT_INFO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub kind: ReplyKind,
    pub next_state: ConversationState,
}

impl Reply {
    pub fn text(&self) -> &'static str {
        self.kind.text()
    }
}

const KEYWORD_RULES: &[(&[&str], ReplyKind)] = &[
    (&["help", "support", "assistance"], ReplyKind::HandoffOffer),
    (&["price", "cost", "quote"], ReplyKind::Pricing),
    (&["book", "appointment", "schedule"], ReplyKind::Booking),
    (&["service", "offer"], ReplyKind::Services),
    (&["contact", "phone", "email"], ReplyKind::ContactDetails),
];

pub fn respond(state: ConversationState, input: &str) -> Reply {
    if state == ConversationState::CollectingContactInfo {
        return Reply {
            kind: ReplyKind::ContactAcknowledged,
            next_state: ConversationState::Idle,
        };
    }

    let lowered = input.to_lowercase();
    let kind = KEYWORD_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, kind)| *kind)
        .unwrap_or(ReplyKind::AskContactInfo);

    // A typed message withdraws any pending handoff offer.
    let next_state = match kind {
        ReplyKind::HandoffOffer => ConversationState::OfferingHandoff,
        ReplyKind::AskContactInfo => ConversationState::CollectingContactInfo,
        _ => ConversationState::Idle,
    };

    Reply { kind, next_state }
}
