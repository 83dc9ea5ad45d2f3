use rtrb::{Consumer, Producer, RingBuffer};

/// Transport changes requested from outside the scheduler's thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportCommand {
    SetBpm(f64),
    SetLooping(bool),
    Stop,
}

/// Sending half of the control queue.
///
/// Commands are applied at the start of the scheduler's next wake. When the
/// queue is full the command is dropped.
pub struct TransportHandle {
    tx: Producer<TransportCommand>,
}

impl TransportHandle {
    pub fn set_bpm(&mut self, bpm: f64) {
        let _ = self.tx.push(TransportCommand::SetBpm(bpm));
    }

    pub fn set_looping(&mut self, looping: bool) {
        let _ = self.tx.push(TransportCommand::SetLooping(looping));
    }

    pub fn stop(&mut self) {
        let _ = self.tx.push(TransportCommand::Stop);
    }

    /// `false` once the scheduler has dropped its end of the queue.
    pub fn is_connected(&self) -> bool {
        !self.tx.is_abandoned()
    }
}

pub const CONTROL_QUEUE_SIZE: usize = 64;

pub(crate) fn control_queue() -> (TransportHandle, Consumer<TransportCommand>) {
    let (tx, rx) = RingBuffer::<TransportCommand>::new(CONTROL_QUEUE_SIZE);
    (TransportHandle { tx }, rx)
}
