/// Git metadata captured by the build script.
///
/// Outside a git checkout vergen emits nothing, so every field is optional.
pub(crate) struct BuildInfo {
    pub commit_sha1: Option<&'static str>,
    pub git_dirty: bool,
}

pub(crate) const BUILD_INFO: BuildInfo = BuildInfo {
    commit_sha1: option_env!("VERGEN_GIT_SHA"),
    git_dirty: match option_env!("VERGEN_GIT_DIRTY") {
        Some(v) => matches!(v.as_bytes(), [b't', b'r', b'u', b'e']),
        None => false,
    },
};
