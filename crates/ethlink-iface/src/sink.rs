use ethlink_frame::Message;

/// Upward half of the message interface.
///
/// The read dispatcher hands every successfully decoded frame to a sink as
/// a [`Message`] whose bytes are the sender's address descriptor followed
/// by the payload.
pub trait MessageSink {
    fn deliver(&mut self, message: Message);
}

impl<F> MessageSink for F
where
    F: FnMut(Message),
{
    fn deliver(&mut self, message: Message) {
        self(message)
    }
}

impl MessageSink for Vec<Message> {
    fn deliver(&mut self, message: Message) {
        self.push(message);
    }
}
