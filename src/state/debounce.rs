// ============================================================================
// DEBOUNCE - Búsqueda mientras se escribe
// ============================================================================
// Regla: se guarda el último input y su timestamp; el valor se aplica cuando
// pasan `delay_ms` sin inputs nuevos. Un input nuevo reemplaza al pendiente.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use gloo_timers::callback::Timeout;

/// Lógica pura (determinista, con tiempo explícito)
#[derive(Clone, Debug, PartialEq)]
pub struct Debouncer {
    delay_ms: f64,
    pending: Option<(String, f64)>,
}

impl Debouncer {
    pub fn new(delay_ms: u32) -> Self {
        Self { delay_ms: delay_ms as f64, pending: None }
    }

    /// Registra un input en `now_ms`, descartando el pendiente
    pub fn input(&mut self, value: &str, now_ms: f64) {
        self.pending = Some((value.to_string(), now_ms));
    }

    /// Devuelve el valor si ya pasó el silencio requerido
    pub fn poll(&mut self, now_ms: f64) -> Option<String> {
        match &self.pending {
            Some((_, at)) if now_ms - at >= self.delay_ms => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    /// Milisegundos que faltan para que el pendiente quede listo
    pub fn remaining_ms(&self, now_ms: f64) -> Option<u32> {
        self.pending
            .as_ref()
            .map(|(_, at)| (at + self.delay_ms - now_ms).max(0.0).ceil() as u32)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Wrapper de navegador: un `Timeout` por input; al soltar el anterior se cancela
#[derive(Clone)]
pub struct DebouncedInput {
    delay_ms: u32,
    state: Rc<RefCell<Debouncer>>,
    timer: Rc<RefCell<Option<Timeout>>>,
}

impl DebouncedInput {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            state: Rc::new(RefCell::new(Debouncer::new(delay_ms))),
            timer: Rc::new(RefCell::new(None)),
        }
    }

    pub fn input<F>(&self, value: String, apply: F)
    where
        F: FnOnce(String) + 'static,
    {
        self.state.borrow_mut().input(&value, js_sys::Date::now());
        let state = self.state.clone();
        // Al reemplazar el slot se suelta (y cancela) el timeout del input anterior
        *self.timer.borrow_mut() = Some(Timeout::new(self.delay_ms, move || fire(state, apply)));
    }

    pub fn cancel(&self) {
        self.timer.borrow_mut().take();
        self.state.borrow_mut().cancel();
    }
}

/// Aplica el valor si pasó el silencio; si el timer se adelantó al reloj
/// se reprograma por lo que falta. `cancel` vacía el pendiente y corta la cadena.
fn fire<F>(state: Rc<RefCell<Debouncer>>, apply: F)
where
    F: FnOnce(String) + 'static,
{
    let now = js_sys::Date::now();
    let ready = state.borrow_mut().poll(now);
    if let Some(value) = ready {
        apply(value);
        return;
    }
    let wait = state.borrow().remaining_ms(now);
    if let Some(wait) = wait {
        // No se guarda en el slot: soltarlo aquí liberaría el closure en ejecución
        Timeout::new(wait.max(1), move || fire(state, apply)).forget();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_only_after_silence() {
        let mut d = Debouncer::new(300);
        d.input("a", 0.0);
        assert_eq!(d.poll(299.0), None);
        assert_eq!(d.poll(300.0).as_deref(), Some("a"));
        assert_eq!(d.poll(1000.0), None);
    }

    #[test]
    fn new_input_restarts_the_wait() {
        let mut d = Debouncer::new(300);
        d.input("an", 0.0);
        d.input("ana", 200.0);
        assert_eq!(d.poll(350.0), None);
        assert_eq!(d.poll(500.0).as_deref(), Some("ana"));
    }

    #[test]
    fn cancel_drops_pending_value() {
        let mut d = Debouncer::new(100);
        d.input("x", 0.0);
        d.cancel();
        assert!(!d.has_pending());
        assert_eq!(d.poll(1000.0), None);
    }

    #[test]
    fn remaining_wait_counts_from_last_input() {
        let mut d = Debouncer::new(300);
        assert_eq!(d.remaining_ms(0.0), None);
        d.input("a", 0.0);
        d.input("ab", 100.0);
        assert_eq!(d.remaining_ms(299.0), Some(101));
        // Timer disparado antes de tiempo: todavía no hay valor
        assert_eq!(d.poll(399.5), None);
        assert_eq!(d.remaining_ms(399.5), Some(1));
        assert_eq!(d.poll(400.0).as_deref(), Some("ab"));
        assert_eq!(d.remaining_ms(400.0), None);
    }
}
