//! Built-in functions available in every scope

use super::types::ValueType;

/// A function provided by the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builtin {
    pub name: &'static str,
    pub parameters: &'static [&'static str],
    pub return_type: ValueType,
    pub description: &'static str,
}

pub const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "escrever",
        parameters: &["mensagem"],
        return_type: ValueType::String,
        description: "Escreve um valor na saída padrão.",
    },
    Builtin {
        name: "ler",
        parameters: &[],
        return_type: ValueType::String,
        description: "Lê um valor da entrada padrão.",
    },
    Builtin {
        name: "raiz",
        parameters: &["numero"],
        return_type: ValueType::Integer,
        description: "Calcula a raiz quadrada de um número.",
    },
    Builtin {
        name: "potencia",
        parameters: &["base", "expoente"],
        return_type: ValueType::Integer,
        description: "Eleva a base ao expoente.",
    },
    Builtin {
        name: "int",
        parameters: &["numero"],
        return_type: ValueType::Integer,
        description: "Converte um valor para inteiro.",
    },
    Builtin {
        name: "real",
        parameters: &["numero"],
        return_type: ValueType::Float,
        description: "Converte um valor para real.",
    },
];

pub fn builtin(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name == name)
}
