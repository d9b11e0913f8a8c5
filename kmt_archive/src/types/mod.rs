mod archive;
pub use self::archive::{ArchiveResult, CollectionRef, DetailLinkRef};

mod cookie;
pub use self::cookie::BrowserCookie;

mod record;
pub use self::record::{ExtractedReaction, MoleculeComponent, ReactionRecord, Structure};
