/// An optimal solution of an LP problem
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct Solution {
    /// Optimal values for each variable
    pub values: Vec<f64>,
    /// Optimal objective value
    pub objective_value: f64,
    /// Dual information from the cost-optimal basis
    pub analysis: Analysis,
    /// Pivots performed across all phases
    pub iterations: usize,
}

/// Detailed analysis of the optimal solution
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// Shadow prices (dual values) for each constraint, in constraint order.
    /// Indicates how much the objective changes per unit increase of the RHS.
    pub shadow_prices: Vec<ShadowPrice>,

    /// Reduced costs for each variable, in variable order.
    /// For non-basic variables, indicates how much the cost must improve to enter the solution.
    pub reduced_costs: Vec<ReducedCost>,

    /// Inequality constraints that hold with equality at the reported solution
    pub binding_constraints: Vec<String>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct ShadowPrice {
    /// Constraint name
    pub constraint: String,
    /// Shadow price value
    pub value: f64,
    /// Interpretation
    pub interpretation: String,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct ReducedCost {
    /// Variable name
    pub variable: String,
    /// Value in the reported solution
    pub value: f64,
    /// Reduced cost
    pub reduced_cost: f64,
    /// Was this variable in the cost-optimal basis?
    pub is_basic: bool,
}

impl Analysis {
    pub fn shadow_price(&self, constraint: &str) -> Option<f64> {
        self.shadow_prices
            .iter()
            .find(|sp| sp.constraint == constraint)
            .map(|sp| sp.value)
    }

    pub fn is_binding(&self, constraint: &str) -> bool {
        self.binding_constraints.iter().any(|name| name == constraint)
    }
}

impl ShadowPrice {
    pub fn new(constraint: impl Into<String>, value: f64, tolerance: f64) -> Self {
        let interpretation = if value.abs() <= tolerance {
            "Non-binding constraint".to_string()
        } else if value > 0.0 {
            format!("Increasing RHS by 1 unit would increase the objective by {:.4}", value)
        } else {
            format!("Increasing RHS by 1 unit would decrease the objective by {:.4}", -value)
        };
        Self {
            constraint: constraint.into(),
            value,
            interpretation,
        }
    }
}
