//! Helpers shared by the participant use cases.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::transport::{Transport, TransportError};
use noa_domain::{Message, encode};
use tracing::debug;

/// Encode and publish `message`, then record it in the transcript.
pub(crate) async fn publish_message<T: Transport + ?Sized>(
    transport: &T,
    logger: &dyn ConversationLogger,
    participant: &str,
    message: &Message,
) -> Result<(), TransportError> {
    transport.publish(encode(message)).await?;
    debug!(%participant, kind = message.type_name(), "Published message");
    logger.log(ConversationEvent::published(participant, message));
    Ok(())
}
