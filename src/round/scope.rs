use std::marker::PhantomData;

use super::ticker::Ticker;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct ListenerId(u64);

/// callbacks registered for events of type `E`, called in registration order
pub struct Listeners<E> {
    next_id: u64,
    entries: Vec<(ListenerId, Box<dyn FnMut(&E)>)>,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self { next_id: 0, entries: Vec::new() }
    }

    pub fn add(&mut self, f: impl FnMut(&E) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(f)));
        id
    }

    /// returns if a listener was removed
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let len_before = self.entries.len();
        self.entries.retain(|(i, _)| *i != id);
        self.entries.len() != len_before
    }

    pub fn dispatch(&mut self, event: &E) {
        for (_, f) in &mut self.entries {
            f(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// everything a round hooks into the host: its listeners and its ticker.
/// [`Self::teardown`] undoes all of it at once.
pub struct RoundScope<E> {
    listeners: Vec<ListenerId>,
    ticker: Ticker,
    torn_down: bool,
    _event: PhantomData<fn(&E)>,
}

impl<E> RoundScope<E> {
    pub fn new(ticker: Ticker) -> Self {
        Self {
            listeners: Vec::new(),
            ticker,
            torn_down: false,
            _event: PhantomData,
        }
    }

    /// registers `f` at `hub`, it stays registered until teardown
    pub fn listen(&mut self, hub: &mut Listeners<E>, f: impl FnMut(&E) + 'static) -> ListenerId {
        debug_assert!(!self.torn_down);
        let id = hub.add(f);
        self.listeners.push(id);
        id
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut Ticker {
        &mut self.ticker
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// detaches every listener of this scope from `hub` and stops the ticker.
    /// returns the number of detached listeners, zero if called again.
    pub fn teardown(&mut self, hub: &mut Listeners<E>) -> usize {
        let nr_detached = self.listeners.drain(..).filter(|&id| hub.remove(id)).count();
        self.ticker.stop();
        self.torn_down = true;
        nr_detached
    }
}

impl<E> Drop for RoundScope<E> {
    fn drop(&mut self) {
        if !self.listeners.is_empty() {
            log::warn!(
                "round scope dropped with {} listeners still attached",
                self.listeners.len()
            );
        }
    }
}
