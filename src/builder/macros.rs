//! Macros for defining machines in one expression.

/// Build a [`MachineBuilder`](crate::MachineBuilder) from statement/guard
/// pairs.
///
/// Expands to a `Result<MachineBuilder<C>, DefinitionError>`. An optional
/// leading `config: <expr>;` sets the [`MachineConfig`](crate::MachineConfig).
///
/// # Example
///
/// ```
/// use guardfsm::{machine_definition, Guard};
/// use guardfsm::expr::Variables;
///
/// let builder = machine_definition! {
///     "A -> B : t0" => Guard::expr("a % 2 == 0").unwrap(),
///     "B -> A : t1" => Guard::new(|vars: &Variables| vars.get("a").is_none()),
/// }
/// .unwrap();
///
/// let machine = builder.compile().unwrap();
/// assert_eq!(machine.states(), ["A", "B"]);
/// ```
#[macro_export]
macro_rules! machine_definition {
    (@build $builder:expr; $( $statement:expr => $guard:expr ),* $(,)?) => {
        (|| -> ::std::result::Result<_, $crate::DefinitionError> {
            #[allow(unused_mut)]
            let mut builder = $builder;
            $(
                builder.add_guarded($statement, $guard)?;
            )*
            ::std::result::Result::Ok(builder)
        })()
    };
    (config: $config:expr; $($rest:tt)*) => {
        $crate::machine_definition!(@build $crate::MachineBuilder::with_config($config); $($rest)*)
    };
    ($($rest:tt)*) => {
        $crate::machine_definition!(@build $crate::MachineBuilder::new(); $($rest)*)
    };
}

#[cfg(test)]
mod tests {
    use crate::builder::DefinitionError;
    use crate::core::Guard;
    use crate::engine::MachineConfig;
    use crate::expr::Variables;

    #[test]
    fn machine_definition_registers_pairs() {
        let builder = machine_definition! {
            "idle -> busy : start" => Guard::<Variables>::expr("jobs > 0").unwrap(),
            "busy -> idle : stop" => Guard::expr("jobs == 0").unwrap(),
        }
        .unwrap();

        assert_eq!(builder.transitions().len(), 2);
        assert!(builder.conditions().contains("start"));
        assert!(builder.conditions().contains("stop"));
    }

    #[test]
    fn machine_definition_accepts_config() {
        let builder = machine_definition! {
            config: MachineConfig::default().with_history_len(2);
            "A -> A : spin" => Guard::<()>::always(),
        }
        .unwrap();

        assert_eq!(builder.config().history_len, 2);
    }

    #[test]
    fn machine_definition_stops_at_first_error() {
        let result = machine_definition! {
            "A -> B : t0" => Guard::<()>::always(),
            "B -> : t1" => Guard::always(),
            "B -> A : t2" => Guard::always(),
        };

        assert!(matches!(result, Err(DefinitionError::InvalidSyntax(_))));
    }
}
