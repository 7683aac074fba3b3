// ============================================================================
// FETCH STATE - Cancelación de fetches obsoletos + flags in-flight
// ============================================================================
// Cada fetch de lista pide un ticket nuevo: el anterior se aborta y su
// resultado (éxito o error) se descarta sin mostrar nada.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use web_sys::{AbortController, AbortSignal};

/// Ticket de un fetch concreto
#[derive(Clone, Debug)]
pub struct FetchTicket {
    generation: u64,
    signal: Option<AbortSignal>,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn signal(&self) -> Option<&AbortSignal> {
        self.signal.as_ref()
    }
}

/// Slot de cancelación de una vista. Los clones comparten el slot.
#[derive(Clone, Default)]
pub struct CancellationSlot {
    generation: Rc<Cell<u64>>,
    controller: Rc<RefCell<Option<AbortController>>>,
}

impl CancellationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aborta el fetch en curso (si hay) y emite un ticket nuevo
    pub fn issue(&self) -> FetchTicket {
        self.abort_current();
        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        let controller = new_controller();
        let signal = controller.as_ref().map(AbortController::signal);
        *self.controller.borrow_mut() = controller;

        FetchTicket { generation, signal }
    }

    /// true si ningún fetch posterior reemplazó a este
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation.get()
    }

    /// Invalida el ticket vigente (p.ej. al desmontar la vista)
    pub fn cancel(&self) {
        self.abort_current();
        self.generation.set(self.generation.get() + 1);
    }

    fn abort_current(&self) {
        if let Some(controller) = self.controller.borrow_mut().take() {
            controller.abort();
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn new_controller() -> Option<AbortController> {
    AbortController::new().ok()
}

// Fuera del navegador no hay fetch que abortar; alcanza con la generación
#[cfg(not(target_arch = "wasm32"))]
fn new_controller() -> Option<AbortController> {
    None
}

/// Flag "operación en curso" para deshabilitar envíos duplicados
#[derive(Clone, Default)]
pub struct InFlight {
    busy: Rc<Cell<bool>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marca como ocupado. Devuelve false si ya había una operación en curso.
    pub fn begin(&self) -> bool {
        if self.busy.get() {
            return false;
        }
        self.busy.set(true);
        true
    }

    pub fn finish(&self) {
        self.busy.set(false);
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let slot = CancellationSlot::new();
        let first = slot.issue();
        assert!(slot.is_current(&first));

        let second = slot.issue();
        assert!(!slot.is_current(&first));
        assert!(slot.is_current(&second));
    }

    #[test]
    fn cancel_invalidates_current_ticket() {
        let slot = CancellationSlot::new();
        let ticket = slot.issue();
        slot.clone().cancel();
        assert!(!slot.is_current(&ticket));
    }

    #[test]
    fn in_flight_blocks_duplicates() {
        let flag = InFlight::new();
        assert!(flag.begin());
        assert!(!flag.begin());
        flag.finish();
        assert!(flag.begin());
    }
}
