use crate::model::method::{Method, RISK_NAME_COLUMN, TASK_AFFECTED_COLUMN, register_columns};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnAudit {
    pub missing_identity: Vec<&'static str>,
    pub missing_by_method: Vec<(Method, Vec<&'static str>)>,
}

impl ColumnAudit {
    pub fn is_complete(&self) -> bool {
        self.missing_identity.is_empty() && self.missing_by_method.is_empty()
    }

    /// Missing columns in register template order.
    pub fn missing_all(&self) -> Vec<&'static str> {
        let missing: Vec<&'static str> = self
            .missing_identity
            .iter()
            .copied()
            .chain(
                self.missing_by_method
                    .iter()
                    .flat_map(|(_, cols)| cols.iter().copied()),
            )
            .collect();
        register_columns()
            .into_iter()
            .filter(|c| missing.contains(c))
            .collect()
    }
}

pub fn audit_columns(columns: &[String]) -> ColumnAudit {
    let has = |name: &str| columns.iter().any(|c| c == name);

    let missing_identity = [RISK_NAME_COLUMN, TASK_AFFECTED_COLUMN]
        .into_iter()
        .filter(|c| !has(*c))
        .collect();

    let mut missing_by_method = Vec::new();
    for method in Method::ALL {
        let missing: Vec<&'static str> = method
            .fields()
            .iter()
            .map(|f| f.column)
            .filter(|c| !has(*c))
            .collect();
        if !missing.is_empty() {
            missing_by_method.push((method, missing));
        }
    }

    ColumnAudit {
        missing_identity,
        missing_by_method,
    }
}
