use anyhow::Result;

use stages::{Bindings, StageSpec, WorkUnit};

use crate::exec::Invocation;
use crate::settings::ExecutionContext;

/// Builds the command line for a single work unit.
pub struct InvocationBuilder<'a> {
    ctx: &'a ExecutionContext,
    /// `receptors/*`, the same for every unit in a run
    receptor_glob: String,
}

impl<'a> InvocationBuilder<'a> {
    pub fn new(ctx: &'a ExecutionContext) -> Result<Self> {
        let receptor_glob = ctx.layout.receptor_glob()?;
        Ok(Self { ctx, receptor_glob })
    }

    /// Render `stage`'s argument template for `unit`,
    /// wrapping it in the cluster launcher when running distributed.
    pub fn build(
        &self,
        stage: &StageSpec,
        unit: &WorkUnit,
        receptor: Option<&str>,
    ) -> Result<Invocation> {
        let bindings = Bindings {
            receptor_glob: &self.receptor_glob,
            context: receptor,
            tuning: &self.ctx.tuning,
        };
        let args = stage.render(unit, &bindings)?;
        let invocation = Invocation::new(&unit.name, stage.program, args, &unit.prefix);
        if self.ctx.distributed {
            Ok(invocation.wrap(&self.ctx.launcher))
        } else {
            Ok(invocation)
        }
    }
}
