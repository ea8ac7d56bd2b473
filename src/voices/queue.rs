use rtrb::{Consumer, Producer, RingBuffer};

/// Smallest queue any voice gets.
pub const QUEUE_CAPACITY: usize = 16;

/// Slots each voice of a pool needs so that `triggers` borrows in one
/// measure never overflow it. A voice is re-borrowed once per pool rotation,
/// and every queued note is consumed before the next measure is generated.
pub fn queue_capacity(triggers: usize, pool_size: usize) -> usize {
    triggers.div_ceil(pool_size.max(1)).max(QUEUE_CAPACITY)
}

/// Create the queue shared by a pool handle and its voice.
pub fn param_queue<P: Send>(capacity: usize) -> (ParamSender<P>, ParamReceiver<P>) {
    let (tx, rx) = RingBuffer::new(capacity.max(1));
    (ParamSender { tx }, ParamReceiver { rx })
}

/// Pool side of a voice's parameter queue.
pub struct ParamSender<P> {
    tx: Producer<P>,
}

impl<P> ParamSender<P> {
    /// Queue parameters at the tail. Hands them back when the queue is full.
    pub fn push(&mut self, params: P) -> Result<(), P> {
        self.tx.push(params).map_err(|rtrb::PushError::Full(params)| params)
    }

    pub fn free_slots(&self) -> usize {
        self.tx.slots()
    }
}

/// Voice side of the queue.
pub struct ParamReceiver<P> {
    rx: Consumer<P>,
}

impl<P> ParamReceiver<P> {
    /// Take the oldest queued parameters.
    pub fn pop(&mut self) -> Option<P> {
        self.rx.pop().ok()
    }

    pub fn len(&self) -> usize {
        self.rx.slots()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_push_order() {
        let (mut tx, mut rx) = param_queue::<u32>(QUEUE_CAPACITY);
        for n in 0..5 {
            tx.push(n).unwrap();
        }
        assert_eq!(rx.len(), 5);
        let drained: Vec<u32> = std::iter::from_fn(|| rx.pop()).collect();
        assert_eq!(drained, vec![0, 1, 2, 3, 4]);
        assert!(rx.is_empty());
    }

    #[test]
    fn overflow_returns_the_params() {
        let (mut tx, _rx) = param_queue::<u32>(QUEUE_CAPACITY);
        for n in 0..QUEUE_CAPACITY as u32 {
            tx.push(n).unwrap();
        }
        assert_eq!(tx.free_slots(), 0);
        assert_eq!(tx.push(99), Err(99));
    }

    #[test]
    fn small_pools_get_deeper_queues() {
        assert_eq!(queue_capacity(32, 32), QUEUE_CAPACITY);
        assert_eq!(queue_capacity(32, 1), 32);
        assert_eq!(queue_capacity(33, 2), 17);
        assert_eq!(queue_capacity(6, 0), QUEUE_CAPACITY);
    }
}
