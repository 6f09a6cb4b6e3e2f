//! Java runtime (Maven projects)

mod templates;

pub use templates::JavaProjectTemplate;

use super::{LanguageHelper, ProxySettings, RuntimeIdentity};
use crate::boilerplate::BoilerplateGenerator;
use crate::config::FnpackConfig;
use crate::error::{LangError, Result};
use crate::fdk::{
    FdkVersionResolver, MavenMetadataSource, PackageSearchSource, ResolvedVersion,
    VersionStrategy,
};
use roxmltree::Document;
use std::fs;
use std::path::Path;
use templates::POM_FILE;
use tracing::debug;

pub const FDK_VERSION_ENV: &str = "FN_JAVA_FDK_VERSION";
pub const MAVEN_METADATA_URL: &str =
    "https://repo1.maven.org/maven2/com/fnproject/fn/fdk/maven-metadata.xml";
pub const PACKAGE_SEARCH_URL: &str =
    "https://api.bintray.com/search/packages/maven?repo=fnproject&g=com.fnproject.fn&a=fdk";
/// Download repository matching [`PACKAGE_SEARCH_URL`]
pub const SECONDARY_REPOSITORY_URL: &str = "https://dl.bintray.com/fnproject/fnproject";

pub const SUPPORTED_JAVA_VERSIONS: &[&str] = &["8", "11"];

const BUILD_IMAGE_REPO: &str = "fnproject/fn-java-fdk-build";
const RUN_IMAGE_REPO: &str = "fnproject/fn-java-fdk";
const MAVEN_REPO_LOCAL: &str = "-Dmaven.repo.local=/usr/share/maven/ref/repository";
const ENTRYPOINT: &str = "com.example.fn.HelloFunction::handleRequest";

pub struct JavaLangHelper {
    version: String,
    claims_language: bool,
    resolver: FdkVersionResolver,
    template: JavaProjectTemplate,
    proxy: ProxySettings,
}

impl JavaLangHelper {
    /// Java helper for `version` resolving its FDK against the configured registries.
    pub fn new(version: impl Into<String>, config: &FnpackConfig) -> Self {
        let timeout = config.request_timeout();
        let strategies: Vec<Box<dyn VersionStrategy>> = vec![
            Box::new(MavenMetadataSource::new(&config.java_metadata_url, timeout)),
            Box::new(PackageSearchSource::new(&config.java_search_url, timeout)),
        ];
        let resolver = FdkVersionResolver::new("Java", FDK_VERSION_ENV, strategies);
        Self::with_resolver(version, resolver)
    }

    pub fn with_resolver(version: impl Into<String>, resolver: FdkVersionResolver) -> Self {
        let version = version.into();
        Self {
            template: JavaProjectTemplate::new(version.clone()),
            version,
            claims_language: false,
            resolver,
            proxy: ProxySettings::from_env(),
        }
    }

    /// Also answer to the plain `java` runtime string and `.java` files.
    pub fn claiming_language(mut self) -> Self {
        self.claims_language = true;
        self
    }

    pub fn with_proxy(mut self, proxy: ProxySettings) -> Self {
        self.proxy = proxy;
        self
    }

    /// `<fdk.version>` declared by the `pom.xml` in `dir`, if any.
    pub fn manifest_fdk_version(dir: &Path) -> Option<String> {
        let content = fs::read_to_string(dir.join(POM_FILE)).ok()?;
        let doc = Document::parse(&content).ok()?;
        let version = doc
            .descendants()
            .find(|n| n.has_tag_name("fdk.version"))?
            .text()?
            .trim()
            .to_string();
        Some(version)
    }

    fn image(&self, repo: &str, jdk_prefix: &str) -> Result<String> {
        let fdk = self.resolver.resolve()?;
        match self.version.as_str() {
            "8" => Ok(format!("{}:{}", repo, fdk.version)),
            "11" => Ok(format!("{}:{}11-{}", repo, jdk_prefix, fdk.version)),
            other => Err(LangError::UnsupportedVersion {
                runtime: "java".to_string(),
                version: other.to_string(),
            }),
        }
    }

    fn maven_opts(&self) -> String {
        let mut opts = self.proxy.jvm_properties();
        opts.push(MAVEN_REPO_LOCAL.to_string());
        opts.join(" ")
    }
}

impl LanguageHelper for JavaLangHelper {
    fn identity(&self) -> RuntimeIdentity {
        let versioned = format!("java{}", self.version);
        if self.claims_language {
            RuntimeIdentity::new(
                vec!["java".to_string(), versioned],
                vec![".java".to_string()],
            )
        } else {
            RuntimeIdentity::new(vec![versioned], Vec::new())
        }
    }

    fn latest_fdk_version(&self) -> Result<Option<ResolvedVersion>> {
        self.resolver.resolve().map(Some)
    }

    fn build_image(&self) -> Result<String> {
        self.image(BUILD_IMAGE_REPO, "jdk")
    }

    fn run_image(&self) -> Result<String> {
        self.image(RUN_IMAGE_REPO, "jre")
    }

    fn has_boilerplate(&self) -> bool {
        true
    }

    fn generate_boilerplate(&self, target_dir: &Path) -> Result<()> {
        let generator = BoilerplateGenerator::new(&self.template);
        // Refuse before touching the network.
        generator.ensure_manifest_absent(target_dir)?;

        let fdk = self.resolver.resolve()?;
        generator.generate(target_dir, &fdk)?;
        Ok(())
    }

    fn supports_pre_build_validation(&self) -> bool {
        true
    }

    fn pre_build_validate(&self, working_dir: &Path) -> Result<()> {
        if !working_dir.join(POM_FILE).is_file() {
            return Err(LangError::MissingManifest {
                manifest: POM_FILE.to_string(),
                hint: "are you sure this is a Maven project?".to_string(),
            });
        }
        debug!(dir = %working_dir.display(), "Found pom.xml");
        Ok(())
    }

    fn build_stage_instructions(&self) -> Vec<String> {
        vec![
            format!("ENV MAVEN_OPTS {}", self.maven_opts()),
            "ADD pom.xml /function/pom.xml".to_string(),
            // --fail-never: a partially populated dependency cache still lets
            // the compile step below report the real error.
            "RUN [\"mvn\", \"package\", \"dependency:copy-dependencies\", \"-DincludeScope=runtime\", \
             \"-DskipTests=true\", \"-Dmdep.prependGroupId=true\", \"-DoutputDirectory=target\", \
             \"--fail-never\"]"
                .to_string(),
            "ADD src /function/src".to_string(),
            "RUN [\"mvn\", \"package\"]".to_string(),
        ]
    }

    fn final_stage_instructions(&self) -> Vec<String> {
        vec!["COPY --from=build-stage /function/target/*.jar /function/app/".to_string()]
    }

    fn entrypoint(&self) -> Result<String> {
        Ok(ENTRYPOINT.to_string())
    }

    fn should_pin_base_images_at_init(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fdk::{SourceError, VersionSource};
    use tempfile::TempDir;

    struct Fixed(&'static str);

    impl VersionStrategy for Fixed {
        fn source(&self) -> VersionSource {
            VersionSource::Primary
        }

        fn endpoint(&self) -> &str {
            "fixed://"
        }

        fn fetch_latest(&self) -> std::result::Result<String, SourceError> {
            Ok(self.0.to_string())
        }
    }

    struct Down;

    impl VersionStrategy for Down {
        fn source(&self) -> VersionSource {
            VersionSource::Primary
        }

        fn endpoint(&self) -> &str {
            "down://"
        }

        fn fetch_latest(&self) -> std::result::Result<String, SourceError> {
            Err(SourceError::Empty {
                url: "down://".to_string(),
            })
        }
    }

    fn helper(version: &str, env: &str) -> JavaLangHelper {
        let resolver = FdkVersionResolver::new("Java", env, vec![Box::new(Fixed("1.0.105"))]);
        JavaLangHelper::with_resolver(version, resolver).with_proxy(ProxySettings::default())
    }

    #[test]
    fn test_identity_of_language_owner() {
        let java = helper("11", "FNPACK_TEST_JAVA_A").claiming_language();
        let identity = java.identity();
        assert_eq!(identity.primary, "java");
        assert_eq!(identity.aliases, vec!["java", "java11"]);
        assert_eq!(identity.extensions, vec![".java"]);
        assert!(java.handles("java11"));
        assert!(!java.handles("java8"));
    }

    #[test]
    fn test_identity_of_versioned_helper() {
        let java8 = helper("8", "FNPACK_TEST_JAVA_B");
        assert_eq!(java8.runtime(), "java8");
        assert!(java8.file_extensions().is_empty());
        assert!(!java8.handles("java"));
    }

    #[test]
    fn test_images_java11() {
        let java = helper("11", "FNPACK_TEST_JAVA_C");
        assert_eq!(
            java.build_image().unwrap(),
            "fnproject/fn-java-fdk-build:jdk11-1.0.105"
        );
        assert_eq!(java.run_image().unwrap(), "fnproject/fn-java-fdk:jre11-1.0.105");
    }

    #[test]
    fn test_images_java8() {
        let java = helper("8", "FNPACK_TEST_JAVA_D");
        assert_eq!(java.build_image().unwrap(), "fnproject/fn-java-fdk-build:1.0.105");
        assert_eq!(java.run_image().unwrap(), "fnproject/fn-java-fdk:1.0.105");
    }

    #[test]
    fn test_unsupported_version() {
        let java = helper("17", "FNPACK_TEST_JAVA_E");
        let err = java.build_image().unwrap_err();
        assert!(matches!(err, LangError::UnsupportedVersion { ref version, .. } if version == "17"));
        assert!(java.run_image().is_err());
    }

    #[test]
    fn test_images_fail_when_resolution_fails() {
        let resolver = FdkVersionResolver::new("Java", "FNPACK_TEST_JAVA_F", vec![Box::new(Down)]);
        let java = JavaLangHelper::with_resolver("11", resolver);
        assert!(matches!(
            java.build_image().unwrap_err(),
            LangError::VersionResolution { .. }
        ));
    }

    #[test]
    fn test_build_stage_instructions() {
        let java = helper("11", "FNPACK_TEST_JAVA_G");
        let steps = java.build_stage_instructions();
        assert_eq!(steps.len(), 5);
        assert_eq!(
            steps[0],
            "ENV MAVEN_OPTS -Dmaven.repo.local=/usr/share/maven/ref/repository"
        );
        assert_eq!(steps[1], "ADD pom.xml /function/pom.xml");
        assert!(steps[2].contains("dependency:copy-dependencies"));
        assert!(steps[2].ends_with("\"--fail-never\"]"));
        assert_eq!(steps[3], "ADD src /function/src");
        assert_eq!(steps[4], "RUN [\"mvn\", \"package\"]");
    }

    #[test]
    fn test_build_stage_carries_proxy() {
        let java = helper("11", "FNPACK_TEST_JAVA_H").with_proxy(ProxySettings {
            http: Some("http://proxy:3128".to_string()),
            https: None,
            no_proxy: Some("localhost,.corp".to_string()),
        });
        assert_eq!(
            java.build_stage_instructions()[0],
            "ENV MAVEN_OPTS -Dhttp.proxyHost=proxy -Dhttp.proxyPort=3128 \
             -Dhttp.nonProxyHosts=localhost|.corp \
             -Dmaven.repo.local=/usr/share/maven/ref/repository"
        );
    }

    #[test]
    fn test_final_stage_and_entrypoint() {
        let java = helper("11", "FNPACK_TEST_JAVA_I");
        assert_eq!(
            java.final_stage_instructions(),
            vec!["COPY --from=build-stage /function/target/*.jar /function/app/"]
        );
        assert_eq!(
            java.entrypoint().unwrap(),
            "com.example.fn.HelloFunction::handleRequest"
        );
        assert!(java.should_pin_base_images_at_init());
        assert_eq!(java.custom_memory(), 0);
    }

    #[test]
    fn test_pre_build_validate() {
        let dir = TempDir::new().unwrap();
        let java = helper("11", "FNPACK_TEST_JAVA_J");

        let err = java.pre_build_validate(dir.path()).unwrap_err();
        assert!(err.to_string().contains("pom.xml"));

        fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();
        assert!(java.pre_build_validate(dir.path()).is_ok());
    }

    #[test]
    fn test_boilerplate_round_trip() {
        let dir = TempDir::new().unwrap();
        let java = helper("11", "FNPACK_TEST_JAVA_K");

        java.generate_boilerplate(dir.path()).unwrap();
        assert!(java.pre_build_validate(dir.path()).is_ok());
        assert_eq!(
            JavaLangHelper::manifest_fdk_version(dir.path()).as_deref(),
            Some("1.0.105")
        );
    }

    #[test]
    fn test_boilerplate_refused_before_resolution() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();
        let resolver = FdkVersionResolver::new("Java", "FNPACK_TEST_JAVA_L", vec![Box::new(Down)]);
        let java = JavaLangHelper::with_resolver("11", resolver);

        assert!(matches!(
            java.generate_boilerplate(dir.path()).unwrap_err(),
            LangError::ManifestAlreadyExists(_)
        ));
    }
}
