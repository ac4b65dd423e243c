//! JSON case files: tensors, the addition to run, and what should come out.

use std::fmt::Debug;
use std::ops::AddAssign;
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tetra_core::Tensor;

use crate::DType;

/// Built-in cases run by `tetra demo`.
pub const DEMO_CASES: &str = include_str!("../cases/demo.json");

#[derive(Debug, Deserialize)]
pub struct CaseFile {
    pub cases: Vec<Case>,
}

#[derive(Debug, Deserialize)]
pub struct Case {
    pub name: String,
    #[serde(default)]
    pub dtype: DType,
    pub this: TensorLiteral,
    pub other: TensorLiteral,
    /// Expected buffer of `this` after the addition. `None` only prints it.
    #[serde(default)]
    pub expected: Option<serde_json::Value>,
    /// The case passes only if construction or addition is rejected.
    #[serde(default)]
    pub expect_error: bool,
}

#[derive(Debug, Deserialize)]
pub struct TensorLiteral {
    pub shape: [usize; 4],
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pass(String),
    Fail(String),
}

impl Outcome {
    pub fn passed(&self) -> bool {
        matches!(self, Outcome::Pass(_))
    }
}

impl CaseFile {
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("malformed case file")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing {}", path.display()))
    }
}

impl Case {
    /// Like [`Case::run`], but a malformed literal becomes a failed outcome.
    pub fn evaluate(&self) -> Outcome {
        self.run()
            .unwrap_or_else(|e| Outcome::Fail(format!("invalid case: {e:#}")))
    }

    pub fn run(&self) -> anyhow::Result<Outcome> {
        match self.dtype {
            DType::F32 => self.run_typed::<f32>(),
            DType::F64 => self.run_typed::<f64>(),
            DType::I32 => self.run_typed::<i32>(),
            DType::I64 => self.run_typed::<i64>(),
        }
    }

    fn run_typed<T>(&self) -> anyhow::Result<Outcome>
    where
        T: DeserializeOwned + AddAssign + Clone + PartialEq + Debug,
    {
        let this_data: Vec<T> = literal(&self.this.data)
            .with_context(|| format!("case '{}': this.data", self.name))?;
        let other_data: Vec<T> = literal(&self.other.data)
            .with_context(|| format!("case '{}': other.data", self.name))?;
        let expected: Option<Vec<T>> = self
            .expected
            .as_ref()
            .map(literal::<T>)
            .transpose()
            .with_context(|| format!("case '{}': expected", self.name))?;

        let result = Tensor::new(self.this.shape, &this_data).and_then(|mut this| {
            let other = Tensor::new(self.other.shape, &other_data)?;
            this.add_(&other)?;
            Ok(this)
        });
        tracing::debug!(case = %self.name, ok = result.is_ok(), "case evaluated");

        let outcome = match (result, self.expect_error) {
            (Err(e), true) => Outcome::Pass(format!("rejected: {e}")),
            (Err(e), false) => Outcome::Fail(format!("unexpected error: {e}")),
            (Ok(t), true) => Outcome::Fail(format!("expected an error, got {t}")),
            (Ok(t), false) => match expected {
                Some(want) if t.as_slice() == want.as_slice() => Outcome::Pass(t.to_string()),
                Some(want) => Outcome::Fail(format!("got {t}, expected {want:?}")),
                None => Outcome::Pass(t.to_string()),
            },
        };
        Ok(outcome)
    }
}

fn literal<T: DeserializeOwned>(value: &serde_json::Value) -> anyhow::Result<Vec<T>> {
    Ok(serde_json::from_value(value.clone())?)
}
