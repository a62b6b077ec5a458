//! Identity lookup: numeric owner and group ids to symbolic names.

use std::io;

/// Resolves numeric ids to names for the `uname` and `gname` keywords.
pub trait IdentityLookup: Send + Sync {
    fn user_name(&self, uid: u32) -> io::Result<String>;
    fn group_name(&self, gid: u32) -> io::Result<String>;
}

/// Lookup through the system user and group databases.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemIdentity;

#[cfg(unix)]
impl IdentityLookup for SystemIdentity {
    fn user_name(&self, uid: u32) -> io::Result<String> {
        use nix::unistd::{Uid, User};

        match User::from_uid(Uid::from_raw(uid))? {
            Some(user) => Ok(user.name),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("unknown user id {uid}"),
            )),
        }
    }

    fn group_name(&self, gid: u32) -> io::Result<String> {
        use nix::unistd::{Gid, Group};

        match Group::from_gid(Gid::from_raw(gid))? {
            Some(group) => Ok(group.name),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("unknown group id {gid}"),
            )),
        }
    }
}

#[cfg(not(unix))]
impl IdentityLookup for SystemIdentity {
    fn user_name(&self, uid: u32) -> io::Result<String> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("no user database to resolve uid {uid}"),
        ))
    }

    fn group_name(&self, gid: u32) -> io::Result<String> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("no group database to resolve gid {gid}"),
        ))
    }
}
