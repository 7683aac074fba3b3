// ============================================================================
// FALLBACK CHAINS - Merge con precedencia explícita
// ============================================================================
// El backend puede poblar el mismo valor lógico por caminos distintos
// (internación, EPC, extracción estructurada). Cada campo declara su lista
// ordenada de accessors; gana el primero con contenido.
// ============================================================================

/// Accessor con nombre (el nombre se loguea para saber de dónde vino el valor)
pub struct Source<C: ?Sized> {
    pub name: &'static str,
    pub get: fn(&C) -> Option<String>,
}

impl<C: ?Sized> Clone for Source<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ?Sized> Copy for Source<C> {}

pub const fn source<C: ?Sized>(name: &'static str, get: fn(&C) -> Option<String>) -> Source<C> {
    Source { name, get }
}

/// Resultado de resolver una cadena
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub value: String,
    pub source: &'static str,
}

/// Primer valor no vacío (tras trim) siguiendo el orden de `chain`
pub fn first_non_empty<C: ?Sized>(ctx: &C, chain: &[Source<C>]) -> Option<Resolved> {
    chain.iter().find_map(|src| {
        (src.get)(ctx)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(|value| Resolved { value, source: src.name })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ctx {
        admission: Option<String>,
        epc: Option<String>,
        structured: Option<String>,
    }

    const CHAIN: [Source<Ctx>; 3] = [
        source("admission", |c: &Ctx| c.admission.clone()),
        source("epc", |c: &Ctx| c.epc.clone()),
        source("structured", |c: &Ctx| c.structured.clone()),
    ];

    #[test]
    fn precedence_is_respected() {
        let ctx = Ctx {
            admission: Some("2024-01-02".into()),
            epc: Some("2024-01-03".into()),
            structured: None,
        };
        let resolved = first_non_empty(&ctx, &CHAIN).unwrap();
        assert_eq!(resolved.value, "2024-01-02");
        assert_eq!(resolved.source, "admission");
    }

    #[test]
    fn blank_values_are_skipped() {
        let ctx = Ctx {
            admission: Some("   ".into()),
            epc: None,
            structured: Some("2024-02-01".into()),
        };
        assert_eq!(first_non_empty(&ctx, &CHAIN).unwrap().source, "structured");
    }

    #[test]
    fn none_when_every_source_is_empty() {
        let ctx = Ctx { admission: None, epc: Some(String::new()), structured: None };
        assert!(first_non_empty(&ctx, &CHAIN).is_none());
    }
}
