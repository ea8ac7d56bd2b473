use log::error;

use crate::{
    error::EngineError,
    voices::{Category, ParamSender, VoiceId},
};

/// The pool's grip on one voice: its identity and the producing end of its
/// parameter queue.
pub struct VoiceHandle<P> {
    id: VoiceId,
    sender: ParamSender<P>,
}

impl<P> VoiceHandle<P> {
    pub fn new(id: VoiceId, sender: ParamSender<P>) -> Self {
        Self { id, sender }
    }

    pub fn id(&self) -> VoiceId {
        self.id
    }

    /// Queue parameters for the voice's next activation.
    ///
    /// Returns `false` if the queue was full and the parameters were dropped;
    /// the caller must then not schedule an activation for them.
    pub fn init(&mut self, params: P) -> bool {
        match self.sender.push(params) {
            Ok(()) => true,
            Err(_) => {
                debug_assert!(false, "{:?} parameter queue overflowed", self.id);
                error!("{:?} parameter queue overflowed; dropping the note", self.id);
                false
            }
        }
    }
}

/// Fixed ring of voices of one category, borrowed in strict rotation.
///
/// There is no return operation: whether a voice is still sounding has no
/// bearing on when it comes round again.
pub struct VoicePool<P> {
    category: Category,
    handles: Vec<VoiceHandle<P>>,
    cursor: usize,
}

impl<P> VoicePool<P> {
    pub fn new(category: Category, handles: Vec<VoiceHandle<P>>) -> Result<Self, EngineError> {
        if handles.is_empty() {
            return Err(EngineError::EmptyPool(category));
        }
        Ok(Self {
            category,
            handles,
            cursor: 0,
        })
    }

    /// Take the voice at the front of the ring and move it to the back.
    pub fn acquire(&mut self) -> &mut VoiceHandle<P> {
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.handles.len();
        &mut self.handles[index]
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
