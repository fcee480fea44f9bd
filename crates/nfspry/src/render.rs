//! Human-readable rendering of attributes and filesystem statistics.

use nfspry_types::nfs3::{FSSTAT3resok, fattr3, ftype3, nfstime3};

#[must_use]
pub const fn type_char(type_: ftype3) -> char {
    match type_ {
        ftype3::NF3REG => '-',
        ftype3::NF3DIR => 'd',
        ftype3::NF3BLK => 'b',
        ftype3::NF3CHR => 'c',
        ftype3::NF3LNK => 'l',
        ftype3::NF3SOCK => 's',
        ftype3::NF3FIFO => 'p',
    }
}

/// `ls -l` style mode string, setuid/setgid/sticky included.
#[must_use]
pub fn mode_string(type_: ftype3, mode: u32) -> String {
    let mut out = String::with_capacity(10);
    out.push(type_char(type_));

    let triplets = [
        (mode >> 6 & 7, mode & 0o4000 != 0, 's'),
        (mode >> 3 & 7, mode & 0o2000 != 0, 's'),
        (mode & 7, mode & 0o1000 != 0, 't'),
    ];
    for (bits, special, special_char) in triplets {
        out.push(if bits & 4 != 0 { 'r' } else { '-' });
        out.push(if bits & 2 != 0 { 'w' } else { '-' });
        out.push(match (bits & 1 != 0, special) {
            (true, false) => 'x',
            (false, false) => '-',
            (true, true) => special_char,
            (false, true) => special_char.to_ascii_uppercase(),
        });
    }
    out
}

#[must_use]
pub fn format_time(time: &nfstime3) -> String {
    chrono::DateTime::from_timestamp(i64::from(time.seconds), time.nseconds)
        .map_or_else(|| "?".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

/// One `ls -l` line; `target` is the symlink destination, if any.
#[must_use]
pub fn long_entry(name: &str, attrs: &fattr3, target: Option<&str>) -> String {
    let mut line = format!(
        "{} {:>3} {:>8} {:>8} {:>10} {} {}",
        mode_string(attrs.type_, attrs.mode),
        attrs.nlink,
        attrs.uid,
        attrs.gid,
        attrs.size,
        format_time(&attrs.mtime),
        name,
    );
    if let Some(target) = target {
        line.push_str(" -> ");
        line.push_str(target);
    }
    line
}

/// `df` style summary of an FSSTAT result, sizes in kilobytes.
#[must_use]
pub fn df_line(where_: &str, stat: &FSSTAT3resok) -> String {
    let total_kb = stat.tbytes / 1024;
    let used_kb = (stat.tbytes - stat.fbytes.min(stat.tbytes)) / 1024;
    let avail_kb = stat.abytes / 1024;
    let capacity = if used_kb + avail_kb == 0 {
        0
    } else {
        used_kb * 100 / (used_kb + avail_kb)
    };
    format!("{where_:<30} {total_kb:>10} {used_kb:>10} {avail_kb:>10} {capacity:>4}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfspry_types::nfs3::{Nfs3Option, specdata3};

    #[test]
    fn mode_strings() {
        assert_eq!(mode_string(ftype3::NF3REG, 0o644), "-rw-r--r--");
        assert_eq!(mode_string(ftype3::NF3DIR, 0o755), "drwxr-xr-x");
        assert_eq!(mode_string(ftype3::NF3LNK, 0o777), "lrwxrwxrwx");
        assert_eq!(mode_string(ftype3::NF3REG, 0o4755), "-rwsr-xr-x");
        assert_eq!(mode_string(ftype3::NF3DIR, 0o1777), "drwxrwxrwt");
        assert_eq!(mode_string(ftype3::NF3BLK, 0o660), "brw-rw----");
    }

    #[test]
    fn long_entry_appends_symlink_target() {
        let attrs = fattr3 {
            type_: ftype3::NF3LNK,
            mode: 0o777,
            nlink: 1,
            uid: 0,
            gid: 0,
            size: 4,
            used: 4,
            rdev: specdata3::default(),
            fsid: 0,
            fileid: 7,
            atime: nfstime3::default(),
            mtime: nfstime3::default(),
            ctime: nfstime3::default(),
        };
        let line = long_entry("link", &attrs, Some("dest"));
        assert!(line.starts_with('l'));
        assert!(line.ends_with("link -> dest"));
    }

    #[test]
    fn df_capacity_is_bounded() {
        let stat = FSSTAT3resok {
            obj_attributes: Nfs3Option::None,
            tbytes: 1024 * 1000,
            fbytes: 1024 * 250,
            abytes: 1024 * 250,
            tfiles: 100,
            ffiles: 50,
            afiles: 50,
            invarsec: 0,
        };
        let line = df_line("zeus:/export", &stat);
        assert!(line.contains("75%"));
    }
}
