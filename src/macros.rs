#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

#[macro_export]
macro_rules! tok {
    ($ty:ident) => {
        $crate::Pattern::Token($crate::TokenType::$ty)
    };
}

#[macro_export]
macro_rules! optional {
    ($($pat:expr),+ $(,)?) => {
        $crate::Pattern::Optional(vec![ $($pat),+ ])
    };
}

#[macro_export]
macro_rules! choose {
    ($($pat:expr),+ $(,)?) => {
        $crate::Pattern::Choose(vec![ $($pat),+ ])
    };
}

#[macro_export]
macro_rules! rule {
    (@guard) => {
        None
    };
    (@guard $guard:expr) => {
        Some($guard)
    };
    (
        name: $name:expr,
        pattern: [ $($pat:expr),* $(,)? ]
        $(, when: $guard:expr)?
        , prod: $prod:expr
        $(,)?
    ) => {{
        $crate::Rule {
            name: $name,
            pattern: vec![ $($pat),* ],
            guard: $crate::rule!(@guard $($guard)?),
            production: $prod,
        }
    }};
}
