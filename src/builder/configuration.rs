//! Build configuration assembly.
//!
//! A [`Configuration`] is everything needed to hand a variant to HPCToolkit's
//! `configure`: the argument list, environment overrides, the `make` to build
//! with, and the manifest the resulting install must match.
//!
//! Arguments are looked up in a [`DependencyConfig`] in a fixed order. Any
//! resolved token of the form `ENV{NAME}=value` is moved into the environment
//! instead of the argument list.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::builder::depconfig::DependencyConfig;
use crate::builder::env::LayeredEnv;
use crate::core::errors::ConfigureError;
use crate::core::manifest::Manifest;
use crate::core::variant::{Feature, Variant};
use crate::util::process::ProcessBuilder;

/// Dependencies every variant needs, in argument order.
const BASELINE: &[&str] = &[
    "--with-boost=",
    "--with-bzip=",
    "--with-dyninst=",
    "--with-elfutils=",
    "--with-tbb=",
    "--with-libmonitor=",
    "--with-libunwind=",
    "--with-xerces=",
    "--with-lzma=",
    "--with-zlib=",
    "--with-libiberty=",
    "--with-memkind=",
    "--with-yaml-cpp=",
];

/// Split-form ROCm arguments, used when `--with-rocm=` is not defined.
const ROCM_SPLIT: &[&str] = &[
    "--with-rocm-hip=",
    "--with-rocm-hsa=",
    "--with-rocm-tracer=",
    "--with-rocm-profiler=",
];

/// A piece of the configure command line, before flattening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// A literal argument.
    Literal(String),
    /// The tokens a dependency line resolved to.
    Resolved(Vec<String>),
}

impl Fragment {
    fn literal(s: impl Into<String>) -> Self {
        Fragment::Literal(s.into())
    }
}

/// A single derived build configuration of HPCToolkit.
#[derive(Debug, Clone, Serialize)]
pub struct Configuration {
    pub variant: Variant,
    pub make: PathBuf,
    pub args: Vec<String>,
    #[serde(serialize_with = "serialize_overrides")]
    pub env: LayeredEnv,
    #[serde(skip)]
    pub manifest: Manifest,
}

fn serialize_overrides<S>(env: &LayeredEnv, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    env.overrides().serialize(serializer)
}

impl Configuration {
    /// Derive the configuration for `variant` on the host machine.
    ///
    /// Fails with [`ConfigureError::ToolchainNotFound`] if `make` is not on
    /// the `PATH` of the dependency environment.
    pub fn new(depcfg: &DependencyConfig, variant: &Variant) -> Result<Self, ConfigureError> {
        Self::for_machine(depcfg, variant, std::env::consts::ARCH)
    }

    /// Derive the configuration as if running on `machine` (e.g. `x86_64`).
    pub fn for_machine(
        depcfg: &DependencyConfig,
        variant: &Variant,
        machine: &str,
    ) -> Result<Self, ConfigureError> {
        let make = depcfg
            .env()
            .which("make")
            .ok_or_else(|| ConfigureError::ToolchainNotFound {
                tool: "make".to_string(),
            })?;

        let fragments = collect_fragments(depcfg, variant, machine)?;

        let mut env = depcfg.env().child();
        let args = partition(fragments, &mut env);

        tracing::debug!("Configured {} ({} arguments)", variant, args.len());

        Ok(Configuration {
            variant: *variant,
            make,
            args,
            env,
            manifest: Manifest::new(variant.enabled(Feature::Mpi)),
        })
    }

    /// The `configure` invocation for this configuration.
    pub fn configure_command(&self, script: &Path, prefix: &Path) -> ProcessBuilder {
        ProcessBuilder::new(script)
            .arg(format!("--prefix={}", prefix.display()))
            .args(&self.args)
            .envs(self.env.overrides())
    }
}

/// Look up every argument `variant` needs, in order.
pub fn collect_fragments(
    depcfg: &DependencyConfig,
    variant: &Variant,
    machine: &str,
) -> Result<Vec<Fragment>, ConfigureError> {
    let get = |arg: &str| depcfg.get(arg).map(Fragment::Resolved);

    let mut fragments = BASELINE
        .iter()
        .copied()
        .map(get)
        .collect::<Result<Vec<_>, _>>()?;

    if machine == "x86_64" {
        fragments.push(get("--with-xed=")?);
    }

    if variant.enabled(Feature::Papi) {
        fragments.push(get("--with-papi=")?);
    } else {
        fragments.push(get("--with-perfmon=")?);
    }

    if variant.enabled(Feature::Cuda) {
        fragments.push(get("--with-cuda=")?);
    }
    if variant.enabled(Feature::Level0) {
        fragments.push(get("--with-level0=")?);
    }
    if variant.enabled(Feature::Opencl) {
        fragments.push(get("--with-opencl=")?);
    }

    if variant.enabled(Feature::Rocm) {
        match get("--with-rocm=") {
            Ok(fragment) => fragments.push(fragment),
            Err(e) if e.is_unsatisfiable() => {
                tracing::debug!("--with-rocm= unusable ({}), using split ROCm arguments", e);
                for &arg in ROCM_SPLIT {
                    fragments.push(get(arg)?);
                }
            }
            Err(e) => return Err(e),
        }
    }

    fragments.push(Fragment::literal("MPICC="));
    fragments.push(Fragment::literal("MPIF77="));
    if variant.enabled(Feature::Mpi) {
        fragments.push(get("MPICXX=")?);
        fragments.push(Fragment::literal("--enable-force-hpcprof-mpi"));
    } else {
        fragments.push(Fragment::literal("MPICXX="));
    }

    if variant.enabled(Feature::Debug) {
        fragments.push(Fragment::literal("--enable-develop"));
    }

    Ok(fragments)
}

/// Flatten `fragments`, moving `ENV{NAME}=value` tokens into `env`.
pub fn partition(fragments: Vec<Fragment>, env: &mut LayeredEnv) -> Vec<String> {
    static ENV_ASSIGN: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^ENV\{(\w+)\}=(.*)$").expect("valid regex"));

    let tokens = fragments.into_iter().flat_map(|f| match f {
        Fragment::Literal(s) => vec![s],
        Fragment::Resolved(v) => v,
    });

    let mut args = Vec::new();
    for token in tokens {
        match ENV_ASSIGN.captures(&token) {
            Some(caps) => env.set(&caps[1], &caps[2]),
            None => args.push(token),
        }
    }
    args
}
