//! Maven project boilerplate for Java functions

use super::SECONDARY_REPOSITORY_URL;
use crate::boilerplate::{BoilerplateBundle, BoilerplateFile, ProjectTemplate};
use crate::fdk::{ResolvedVersion, VersionSource};

pub const POM_FILE: &str = "pom.xml";
const SOURCE_DIR: &str = "src/main/java/com/example/fn";
const TEST_DIR: &str = "src/test/java/com/example/fn";

pub struct JavaProjectTemplate {
    java_version: String,
}

impl JavaProjectTemplate {
    pub fn new(java_version: impl Into<String>) -> Self {
        Self {
            java_version: java_version.into(),
        }
    }

    /// Render `pom.xml`. Versions resolved from the secondary registry are
    /// not mirrored on Maven Central, so that manifest also declares the
    /// secondary registry as a repository.
    pub fn pom(&self, fdk: &ResolvedVersion) -> String {
        let repositories = match fdk.source {
            VersionSource::Secondary => {
                REPOSITORIES_BLOCK.replace("@REPOSITORY_URL@", SECONDARY_REPOSITORY_URL)
            }
            VersionSource::Primary | VersionSource::Override => String::new(),
        };

        POM_TEMPLATE
            .replace("@FDK_VERSION@", &fdk.version)
            .replace("@JAVA_VERSION@", &self.java_version)
            .replace("@REPOSITORIES@", &repositories)
    }
}

impl ProjectTemplate for JavaProjectTemplate {
    fn manifest_name(&self) -> &str {
        POM_FILE
    }

    fn render(&self, fdk: &ResolvedVersion) -> BoilerplateBundle {
        BoilerplateBundle::new(BoilerplateFile::new(POM_FILE, self.pom(fdk)))
            .with_file(format!("{}/HelloFunction.java", SOURCE_DIR), HELLO_FUNCTION)
            .with_file(format!("{}/HelloFunctionTest.java", TEST_DIR), HELLO_FUNCTION_TEST)
    }
}

const REPOSITORIES_BLOCK: &str = r#"
    <repositories>
        <repository>
            <id>fn-release-repo</id>
            <url>@REPOSITORY_URL@</url>
            <releases>
                <enabled>true</enabled>
            </releases>
            <snapshots>
                <enabled>false</enabled>
            </snapshots>
        </repository>
    </repositories>
"#;

const POM_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
    <modelVersion>4.0.0</modelVersion>
    <properties>
        <project.build.sourceEncoding>UTF-8</project.build.sourceEncoding>
        <fdk.version>@FDK_VERSION@</fdk.version>
    </properties>
    <groupId>com.example.fn</groupId>
    <artifactId>hello</artifactId>
    <version>1.0.0</version>
@REPOSITORIES@
    <dependencies>
        <dependency>
            <groupId>com.fnproject.fn</groupId>
            <artifactId>api</artifactId>
            <version>${fdk.version}</version>
        </dependency>
        <dependency>
            <groupId>com.fnproject.fn</groupId>
            <artifactId>testing-core</artifactId>
            <version>${fdk.version}</version>
            <scope>test</scope>
        </dependency>
        <dependency>
            <groupId>com.fnproject.fn</groupId>
            <artifactId>testing-junit4</artifactId>
            <version>${fdk.version}</version>
            <scope>test</scope>
        </dependency>
        <dependency>
            <groupId>junit</groupId>
            <artifactId>junit</artifactId>
            <version>4.12</version>
            <scope>test</scope>
        </dependency>
    </dependencies>

    <build>
        <plugins>
            <plugin>
                <groupId>org.apache.maven.plugins</groupId>
                <artifactId>maven-compiler-plugin</artifactId>
                <version>3.3</version>
                <configuration>
                    <source>@JAVA_VERSION@</source>
                    <target>@JAVA_VERSION@</target>
                </configuration>
            </plugin>
            <plugin>
                <groupId>org.apache.maven.plugins</groupId>
                <artifactId>maven-surefire-plugin</artifactId>
                <version>2.22.1</version>
                <configuration>
                    <useSystemClassLoader>false</useSystemClassLoader>
                </configuration>
            </plugin>
        </plugins>
    </build>
</project>
"#;

const HELLO_FUNCTION: &str = r#"package com.example.fn;

public class HelloFunction {

    public String handleRequest(String input) {
        String name = (input == null || input.isEmpty()) ? "world" : input;

        System.out.println("Inside Java Hello World function");
        return "Hello, " + name + "!";
    }

}
"#;

const HELLO_FUNCTION_TEST: &str = r#"package com.example.fn;

import com.fnproject.fn.testing.*;
import org.junit.*;

import static org.junit.Assert.*;

public class HelloFunctionTest {

    @Rule
    public final FnTestingRule testing = FnTestingRule.createDefault();

    @Test
    public void shouldReturnGreeting() {
        testing.givenEvent().enqueue();
        testing.thenRun(HelloFunction.class, "handleRequest");

        FnResult result = testing.getOnlyResult();
        assertEquals("Hello, world!", result.getBodyAsString());
    }

}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    fn resolved(source: VersionSource) -> ResolvedVersion {
        ResolvedVersion {
            version: "1.0.105".to_string(),
            source,
        }
    }

    fn text_of<'a>(doc: &'a Document, tag: &str) -> Vec<&'a str> {
        doc.descendants()
            .filter(|n| n.has_tag_name(tag))
            .filter_map(|n| n.text())
            .collect()
    }

    #[test]
    fn test_primary_pom_is_valid_xml_without_repositories() {
        let pom = JavaProjectTemplate::new("11").pom(&resolved(VersionSource::Primary));
        let doc = Document::parse(&pom).unwrap();

        assert_eq!(text_of(&doc, "fdk.version"), vec!["1.0.105"]);
        assert_eq!(text_of(&doc, "source"), vec!["11"]);
        assert_eq!(text_of(&doc, "target"), vec!["11"]);
        assert!(!doc.descendants().any(|n| n.has_tag_name("repositories")));
    }

    #[test]
    fn test_secondary_pom_declares_repository() {
        let pom = JavaProjectTemplate::new("8").pom(&resolved(VersionSource::Secondary));
        let doc = Document::parse(&pom).unwrap();

        assert_eq!(text_of(&doc, "url"), vec![SECONDARY_REPOSITORY_URL]);
        assert_eq!(text_of(&doc, "source"), vec!["8"]);
    }

    #[test]
    fn test_override_uses_standard_pom() {
        let pom = JavaProjectTemplate::new("11").pom(&resolved(VersionSource::Override));
        assert!(!pom.contains("<repositories>"));
        assert!(!pom.contains('@'));
    }

    #[test]
    fn test_render_layout() {
        let bundle = JavaProjectTemplate::new("11").render(&resolved(VersionSource::Primary));
        let paths: Vec<String> = bundle
            .files()
            .map(|f| f.path.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            paths,
            vec![
                "pom.xml",
                "src/main/java/com/example/fn/HelloFunction.java",
                "src/test/java/com/example/fn/HelloFunctionTest.java",
            ]
        );
    }
}
