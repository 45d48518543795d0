//! The HPCToolkit install catalog.

use super::Entry;

const EXT_LIBS: &str = "lib/hpctoolkit/ext-libs";

/// Pattern for `.so` followed by `n` numeric version components.
fn so(n: usize) -> String {
    format!(r"\.so{}", r"\.\d+".repeat(n))
}

fn ext(name: &str, main_suffix: &str, suffixes: &[String]) -> Entry {
    Entry::SuffixLib {
        path: format!("{}/{}", EXT_LIBS, name).into(),
        main_suffix: main_suffix.to_string(),
        suffixes: suffixes.to_vec(),
    }
}

/// A libtool-installed library: `.so.0.0.0` plus `.so.0` and `.so` links.
fn libtool(name: &str) -> Entry {
    Entry::versioned_lib(format!("lib/hpctoolkit/{}.so", name), ".0.0.0", &[".0", ""])
}

/// Entries present in every install.
pub(super) fn base() -> Vec<Entry> {
    let mut entries = vec![
        ext("libboost_atomic-mt", ".so", &[so(3)]),
        ext("libboost_atomic", ".so", &[so(3)]),
        ext("libboost_chrono", ".so", &[so(3)]),
        ext("libboost_date_time-mt", ".so", &[so(3)]),
        ext("libboost_date_time", ".so", &[so(3)]),
        ext("libboost_filesystem-mt", ".so", &[so(3)]),
        ext("libboost_filesystem", ".so", &[so(3)]),
        ext("libboost_graph-mt", ".so", &[so(3)]),
        ext("libboost_graph", ".so", &[so(3)]),
        ext("libboost_regex-mt", ".so", &[so(3)]),
        ext("libboost_regex", ".so", &[so(3)]),
        ext("libboost_system-mt", ".so", &[so(3)]),
        ext("libboost_system", ".so", &[so(3)]),
        ext("libboost_thread-mt", ".so", &[so(3)]),
        ext("libboost_thread", ".so", &[so(3)]),
        ext("libboost_timer-mt", ".so", &[so(3)]),
        ext("libboost_timer", ".so", &[so(3)]),
        ext("libbz2", ".so", &[so(1), so(2), so(3)]),
        ext("libcommon", ".so", &[so(2), so(3)]),
        ext("libdw", ".so", &[so(1), r"-\d+\.\d+\.so".to_string()]),
        ext("libdynDwarf", ".so", &[so(2), so(3)]),
        ext("libdynElf", ".so", &[so(1), r"-\d+\.\d+\.so".to_string()]),
        ext("libelf", ".so", &[so(1), r"-\d+\.\d+\.so".to_string()]),
        ext("libinstructionAPI", ".so", &[so(1), r"-\d+\.\d+\.so".to_string()]),
        ext("liblzma", ".so", &[so(1), so(3)]),
        ext("libmonitor_wrap", ".a", &[]),
        ext("libmonitor", ".so", &[".so.0".to_string(), ".so.0.0.0".to_string()]),
        ext("libparseAPI", ".so", &[so(2), so(3)]),
        ext("libpfm", ".so", &[so(1), so(3)]),
        ext("libsymtabAPI", ".so", &[so(2), so(3)]),
        ext("libtbb", ".so", &[so(1)]),
        ext("libtbbmalloc_proxy", ".so", &[so(1)]),
        ext("libtbbmalloc", ".so", &[so(1)]),
        ext("libxerces-c", ".a", &[]),
        ext("libxerces-c", ".so", &[r"-\d+.\d+\.so".to_string()]),
        ext("libz", ".a", &[]),
        ext("libz", ".so", &[so(1), so(3)]),
    ];

    entries.extend(FILES.iter().copied().map(Entry::file));
    entries.extend(LIBTOOL_LIBS.iter().copied().map(libtool));
    entries
}

/// Entries only present in MPI-enabled installs.
pub(super) fn mpi() -> Vec<Entry> {
    vec![Entry::file("bin/hpcprof-mpi")]
}

const LIBTOOL_LIBS: &[&str] = &[
    "libhpcrun_audit",
    "libhpcrun_dlmopen",
    "libhpcrun_fake_audit",
    "libhpcrun_ga",
    "libhpcrun_gprof",
    "libhpcrun_io",
    "libhpcrun_memleak",
    "libhpcrun_pthread",
    "libhpctoolkit",
];

const FILES: &[&str] = &[
    "bin/hpclink",
    "bin/hpcprof",
    "bin/hpcrun",
    "bin/hpcstruct",
    "include/hpctoolkit.h",
    "lib/hpctoolkit/hash-file",
    "lib/hpctoolkit/libhpcrun_audit.a",
    "lib/hpctoolkit/libhpcrun_audit.la",
    "lib/hpctoolkit/libhpcrun_dlmopen.a",
    "lib/hpctoolkit/libhpcrun_dlmopen.la",
    "lib/hpctoolkit/libhpcrun_fake_audit.a",
    "lib/hpctoolkit/libhpcrun_fake_audit.la",
    "lib/hpctoolkit/libhpcrun_ga.a",
    "lib/hpctoolkit/libhpcrun_ga.la",
    "lib/hpctoolkit/libhpcrun_gprof.a",
    "lib/hpctoolkit/libhpcrun_gprof.la",
    "lib/hpctoolkit/libhpcrun_io.a",
    "lib/hpctoolkit/libhpcrun_io.la",
    "lib/hpctoolkit/libhpcrun_memleak.a",
    "lib/hpctoolkit/libhpcrun_memleak.la",
    "lib/hpctoolkit/libhpcrun_pthread.a",
    "lib/hpctoolkit/libhpcrun_pthread.la",
    "lib/hpctoolkit/libhpcrun_wrap.a",
    "lib/hpctoolkit/libhpcrun.o",
    "lib/hpctoolkit/libhpcrun.so",
    "lib/hpctoolkit/libhpctoolkit.a",
    "lib/hpctoolkit/libhpctoolkit.la",
    "lib/hpctoolkit/plugins/ga",
    "lib/hpctoolkit/plugins/io",
    "lib/hpctoolkit/plugins/memleak",
    "lib/hpctoolkit/plugins/pthread",
    "libexec/hpctoolkit/config.guess",
    "libexec/hpctoolkit/dotgraph-bin",
    "libexec/hpctoolkit/dotgraph",
    "libexec/hpctoolkit/hpcfnbounds",
    "libexec/hpctoolkit/hpcguess",
    "libexec/hpctoolkit/hpclog",
    "libexec/hpctoolkit/hpcplatform",
    "libexec/hpctoolkit/hpcproftt-bin",
    "libexec/hpctoolkit/hpcproftt",
    "libexec/hpctoolkit/hpcsummary",
    "libexec/hpctoolkit/hpctracedump",
    "libexec/hpctoolkit/renamestruct.sh",
    "share/doc/hpctoolkit/documentation.html",
    "share/doc/hpctoolkit/download.html",
    "share/doc/hpctoolkit/examples.html",
    "share/doc/hpctoolkit/fig/hpctoolkit-workflow.png",
    "share/doc/hpctoolkit/fig/hpcviewer-annotated-screenshot.jpg",
    "share/doc/hpctoolkit/fig/index.html",
    "share/doc/hpctoolkit/fig/spacer.gif",
    "share/doc/hpctoolkit/FORMATS.md",
    "share/doc/hpctoolkit/googleeeb6a75d4102e1ef.html",
    "share/doc/hpctoolkit/hpctoolkit.org.sitemap.txt",
    "share/doc/hpctoolkit/index.html",
    "share/doc/hpctoolkit/info-acks.html",
    "share/doc/hpctoolkit/info-people.html",
    "share/doc/hpctoolkit/LICENSE",
    "share/doc/hpctoolkit/man/hpclink.html",
    "share/doc/hpctoolkit/man/hpcprof-mpi.html",
    "share/doc/hpctoolkit/man/hpcprof.html",
    "share/doc/hpctoolkit/man/hpcproftt.html",
    "share/doc/hpctoolkit/man/hpcrun.html",
    "share/doc/hpctoolkit/man/hpcstruct.html",
    "share/doc/hpctoolkit/man/hpctoolkit.html",
    "share/doc/hpctoolkit/man/hpcviewer.html",
    "share/doc/hpctoolkit/manual/HPCToolkit-users-manual.pdf",
    "share/doc/hpctoolkit/overview.html",
    "share/doc/hpctoolkit/publications.html",
    "share/doc/hpctoolkit/README.Acknowledgments",
    "share/doc/hpctoolkit/README.Install",
    "share/doc/hpctoolkit/README.md",
    "share/doc/hpctoolkit/README.ReleaseNotes",
    "share/doc/hpctoolkit/software-instructions.html",
    "share/doc/hpctoolkit/software.html",
    "share/doc/hpctoolkit/spack-issues.html",
    "share/doc/hpctoolkit/style/footer-hpctoolkit.js",
    "share/doc/hpctoolkit/style/header-hpctoolkit.js",
    "share/doc/hpctoolkit/style/header.gif",
    "share/doc/hpctoolkit/style/index.html",
    "share/doc/hpctoolkit/style/style.css",
    "share/doc/hpctoolkit/training.html",
    "share/hpctoolkit/dtd/hpc-experiment.dtd",
    "share/hpctoolkit/dtd/hpc-structure.dtd",
    "share/hpctoolkit/dtd/hpcprof-config.dtd",
    "share/hpctoolkit/dtd/mathml/isoamsa.ent",
    "share/hpctoolkit/dtd/mathml/isoamsb.ent",
    "share/hpctoolkit/dtd/mathml/isoamsc.ent",
    "share/hpctoolkit/dtd/mathml/isoamsn.ent",
    "share/hpctoolkit/dtd/mathml/isoamso.ent",
    "share/hpctoolkit/dtd/mathml/isoamsr.ent",
    "share/hpctoolkit/dtd/mathml/isobox.ent",
    "share/hpctoolkit/dtd/mathml/isocyr1.ent",
    "share/hpctoolkit/dtd/mathml/isocyr2.ent",
    "share/hpctoolkit/dtd/mathml/isodia.ent",
    "share/hpctoolkit/dtd/mathml/isogrk3.ent",
    "share/hpctoolkit/dtd/mathml/isolat1.ent",
    "share/hpctoolkit/dtd/mathml/isolat2.ent",
    "share/hpctoolkit/dtd/mathml/isomfrk.ent",
    "share/hpctoolkit/dtd/mathml/isomopf.ent",
    "share/hpctoolkit/dtd/mathml/isomscr.ent",
    "share/hpctoolkit/dtd/mathml/isonum.ent",
    "share/hpctoolkit/dtd/mathml/isopub.ent",
    "share/hpctoolkit/dtd/mathml/isotech.ent",
    "share/hpctoolkit/dtd/mathml/mathml.dtd",
    "share/hpctoolkit/dtd/mathml/mmlalias.ent",
    "share/hpctoolkit/dtd/mathml/mmlextra.ent",
    "share/hpctoolkit/dtd/mathml/xhtml1-transitional-mathml.dtd",
    "share/man/man1/hpclink.1hpctoolkit",
    "share/man/man1/hpcprof-mpi.1hpctoolkit",
    "share/man/man1/hpcprof.1hpctoolkit",
    "share/man/man1/hpcproftt.1hpctoolkit",
    "share/man/man1/hpcrun.1hpctoolkit",
    "share/man/man1/hpcstruct.1hpctoolkit",
    "share/man/man1/hpctoolkit.1hpctoolkit",
    "share/man/man1/hpcviewer.1hpctoolkit",
];
