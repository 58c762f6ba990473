//! OpenCL (`.aocx`) bitstreams
//!
//! aocx files carry no identity the hook can inspect.

use std::path::{Path, PathBuf};

use super::{Bitstream, BitstreamContext, BitstreamFormat, path_arg, run_programmer};
use crate::error::Result;

pub struct OpenClBitstream<'a> {
    path: PathBuf,
    ctx: BitstreamContext<'a>,
}

impl<'a> OpenClBitstream<'a> {
    pub fn new(path: PathBuf, ctx: BitstreamContext<'a>) -> Self {
        Self { path, ctx }
    }
}

impl Bitstream for OpenClBitstream<'_> {
    fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> BitstreamFormat {
        BitstreamFormat::Aocx
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn program(&self) -> Result<()> {
        let args = vec![
            "program".into(),
            format!("acl{}", self.ctx.request.device).into(),
            path_arg(&self.path),
        ];
        run_programmer(&self.ctx, &self.ctx.config.aocl, args)
    }
}
