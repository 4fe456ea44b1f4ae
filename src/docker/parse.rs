use crate::scanner::ItemId;
use crate::utils;

use super::{ResourceKind, VolumeItem};

const VOLUME_HEADER: &str = "VOLUME NAME";
const BUILD_CACHE_HEADER: &str = "Build cache usage:";

/// Volumes with no attached containers, in report order.
pub fn parse_dangling_volumes(output: &str) -> Vec<VolumeItem> {
    let mut volumes = Vec::new();
    let mut in_volumes = false;

    for line in output.lines() {
        if line.contains(VOLUME_HEADER) {
            in_volumes = true;
            continue;
        }
        if line.contains(BUILD_CACHE_HEADER) {
            in_volumes = false;
        }
        if !in_volumes || line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        let [name, links, size, ..] = fields.as_slice() else {
            continue;
        };
        // Strict: anything but a literal "0" means attached or unknown.
        if *links != "0" {
            continue;
        }
        if let Ok(size) = utils::parse_size(size) {
            volumes.push(VolumeItem {
                id: ItemId::next(),
                kind: ResourceKind::Volume,
                name: name.to_string(),
                size,
                selected: true,
            });
        }
    }

    volumes
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "\
Images space usage:

REPOSITORY   TAG       IMAGE ID       CREATED       SIZE      SHARED SIZE   UNIQUE SIZE   CONTAINERS
postgres     16        1a2b3c4d5e6f   2 weeks ago   432MB     0B            432MB         1

Containers space usage:

CONTAINER ID   IMAGE         COMMAND                  LOCAL VOLUMES   SIZE      CREATED       STATUS    NAMES
0f1e2d3c4b5a   postgres:16   \"docker-entrypoint.s…\"   1               63B       2 weeks ago   Up        db

Local Volumes space usage:

VOLUME NAME                                                        LINKS     SIZE
3f9c1e0b7a2d4c6e8f0a1b2c3d4e5f60718293a4b5c6d7e8f9a0b1c2d3e4f5a6   0         1.5KB
pgdata                                                             2         41.2MB
old_cache                                                          0         2GB

Build cache usage: 0B

CACHE ID       CACHE TYPE     SIZE      CREATED        LAST USED      USAGE     SHARED
k2j3h4g5f6d7   regular        0         3 weeks ago    3 weeks ago    1         true
";

    #[test]
    fn keeps_only_unattached_volumes() {
        let volumes = parse_dangling_volumes(REPORT);

        let names: Vec<_> = volumes.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "3f9c1e0b7a2d4c6e8f0a1b2c3d4e5f60718293a4b5c6d7e8f9a0b1c2d3e4f5a6",
                "old_cache"
            ]
        );
        assert_eq!(volumes[0].size, 1536);
        assert_eq!(volumes[1].size, 2_147_483_648);
        assert!(volumes.iter().all(|v| v.selected && v.kind == ResourceKind::Volume));
    }

    #[test]
    fn unparseable_size_drops_only_that_row() {
        let report = "\
VOLUME NAME   LINKS   SIZE
a             0       N/A
b             0       10MB
c             0       3TB
";
        let volumes = parse_dangling_volumes(report);
        assert_eq!(volumes.len(), 1);
        assert_eq!(volumes[0].name, "b");
        assert_eq!(volumes[0].size, 10 * 1_048_576);
    }

    #[test]
    fn links_must_be_literal_zero() {
        let report = "\
VOLUME NAME   LINKS   SIZE
a             00      1MB
b             -       1MB
c             0       1MB
";
        let volumes = parse_dangling_volumes(report);
        assert_eq!(volumes.len(), 1);
        assert_eq!(volumes[0].name, "c");
    }

    #[test]
    fn short_rows_are_skipped() {
        let report = "VOLUME NAME   LINKS   SIZE\nlonely 0\n";
        assert!(parse_dangling_volumes(report).is_empty());
    }

    #[test]
    fn rows_after_build_cache_are_ignored() {
        let report = "\
Build cache usage: 0B
x   0   1MB
VOLUME NAME   LINKS   SIZE
v   0   1MB
Build cache usage: 0B
y   0   1MB
";
        let volumes = parse_dangling_volumes(report);
        assert_eq!(volumes.len(), 1);
        assert_eq!(volumes[0].name, "v");
    }

    #[test]
    fn unexpected_output_yields_nothing() {
        assert!(parse_dangling_volumes("").is_empty());
        assert!(parse_dangling_volumes(
            "Cannot connect to the Docker daemon at unix:///var/run/docker.sock."
        )
        .is_empty());
    }
}
