//! Shell-script stand-ins for the external tools, for integration tests.
//!
//! The fake solver behaves like the real one at the file level: the
//! coefficient input produces the ten maps, the production input produces
//! the potentials and a log with the success marker. Dropping a file named
//! `fail` into a job directory makes the solver exit non-zero there, which
//! is how tests induce a failure in one job of a batch.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub struct FakeTools {
    pub solver: String,
    pub editor: String,
    pub protonate: String,
    count_file: PathBuf,
}

impl FakeTools {
    /// Number of solver invocations so far, across all job directories.
    pub fn solver_calls(&self) -> usize {
        std::fs::read_to_string(&self.count_file)
            .map(|s| s.lines().count())
            .unwrap_or(0)
    }
}

fn write_script(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.display().to_string()
}

/// Installs the three fake tools under `dir` and returns their paths.
pub fn install(dir: &Path) -> FakeTools {
    let count_file = dir.join("solver-calls");
    let solver = write_script(
        dir,
        "apbs.sh",
        &format!(
            r#"echo x >> {count}
if [ -e fail ]; then
    echo induced failure >&2
    exit 1
fi
case "$1" in
coeff.in)
    for f in dielx diely dielz kappa charge; do
        for g in cg fg; do echo map > "${{f}}_${{g}}.dx"; done
    done ;;
solve.in)
    echo "Global net ELEC energy = 4.2E+01 kJ/mol"
    echo pot > pot_cg.dx
    echo pot > pot_fg.dx
    echo "Thanks for using APBS" ;;
esac"#,
            count = count_file.display()
        ),
    );
    let editor = write_script(dir, "draw_membrane2.sh", r#"cp "$1" "${1%.dx}_m.dx""#);
    // $5 is the input pdb, $6 the output pqr
    let protonate = write_script(dir, "pdb2pqr.sh", r#"cp "$5" "$6""#);
    FakeTools {
        solver,
        editor,
        protonate,
        count_file,
    }
}
