//! Skeletons for a new project.

use crate::domain::templates::RenderContext;
use crate::domain::wiring::{
    HANDLERS_MARKER, IMPORTS_MARKER, MODULES_MARKER, PROVIDERS_MARKER, ROUTES_MARKER,
};

pub struct ProjectModel<'a> {
    pub name: &'a str,
    pub module_path: &'a str,
    pub go_version: &'a str,
    pub framework_version: &'a str,
    pub framework_replace: Option<&'a str>,
}

impl ProjectModel<'_> {
    fn context(&self) -> RenderContext {
        RenderContext::new()
            .with_variable("PROJECT_NAME", self.name)
            .with_variable("MODULE", self.module_path)
            .with_variable("GO_VERSION", self.go_version)
            .with_variable("FRAMEWORK_VERSION", self.framework_version)
            .with_variable(
                "REPLACE",
                self.framework_replace
                    .map(|r| format!("\nreplace github.com/soliton-go/framework => {r}\n"))
                    .unwrap_or_default(),
            )
            .with_variable("IMPORTS_MARKER", IMPORTS_MARKER)
            .with_variable("PROVIDERS_MARKER", PROVIDERS_MARKER)
            .with_variable("MODULES_MARKER", MODULES_MARKER)
            .with_variable("HANDLERS_MARKER", HANDLERS_MARKER)
            .with_variable("ROUTES_MARKER", ROUTES_MARKER)
    }

    /// `(project-relative path, content)` for every skeleton file.
    pub fn files(&self) -> Vec<(&'static str, String)> {
        let ctx = self.context();
        vec![
            ("go.mod", ctx.render(GO_MOD)),
            ("cmd/main.go", ctx.render(MAIN)),
            ("configs/config.yaml", ctx.render(CONFIG)),
            ("configs/config.example.yaml", ctx.render(CONFIG_EXAMPLE)),
            ("internal/interfaces/http/response.go", ctx.render(RESPONSE)),
            (".gitignore", ctx.render(GITIGNORE)),
            ("README.md", ctx.render(README)),
            ("Makefile", ctx.render(MAKEFILE)),
        ]
    }
}

/// Directories every project starts with.
pub const PROJECT_DIRS: [&str; 6] = [
    "cmd",
    "configs",
    "internal/domain",
    "internal/application",
    "internal/infrastructure/persistence",
    "internal/interfaces/http",
];

const GO_MOD: &str = r#"module {{MODULE}}

go {{GO_VERSION}}

require (
	github.com/soliton-go/framework {{FRAMEWORK_VERSION}}
	github.com/gin-gonic/gin v1.11.0
	github.com/google/uuid v1.6.0
	go.uber.org/fx v1.24.0
	gorm.io/gorm v1.31.1
)
{{REPLACE}}"#;

const MAIN: &str = r#"package main

import (
	"context"
	"fmt"

	"github.com/gin-gonic/gin"
	"go.uber.org/fx"
	"go.uber.org/zap"
	_ "gorm.io/gorm" // kept for fx.Invoke signatures using *gorm.DB

	"github.com/soliton-go/framework/core/config"
	"github.com/soliton-go/framework/core/logger"
	"github.com/soliton-go/framework/orm"

{{IMPORTS_MARKER}}
)

func main() {
	fx.New(
		fx.Provide(
			config.NewConfig,
			logger.NewLogger,
			orm.NewGormDB,
{{PROVIDERS_MARKER}}
			NewRouter,
		),

{{MODULES_MARKER}}

{{HANDLERS_MARKER}}

{{ROUTES_MARKER}}

		fx.Invoke(StartServer),
	).Run()
}

// NewRouter builds the gin engine with the health endpoint.
func NewRouter() *gin.Engine {
	r := gin.Default()
	r.GET("/health", func(c *gin.Context) {
		c.JSON(200, gin.H{"status": "ok"})
	})
	return r
}

// StartServer runs the HTTP server inside the Fx lifecycle.
func StartServer(lc fx.Lifecycle, cfg *config.Config, logger *zap.Logger, r *gin.Engine) {
	addr := fmt.Sprintf("%s:%d", cfg.GetString("server.host"), cfg.GetInt("server.port"))
	lc.Append(fx.Hook{
		OnStart: func(ctx context.Context) error {
			logger.Info("server starting", zap.String("addr", addr))
			go func() {
				if err := r.Run(addr); err != nil {
					logger.Fatal("server stopped", zap.Error(err))
				}
			}()
			return nil
		},
		OnStop: func(ctx context.Context) error {
			return nil
		},
	})
}
"#;

const CONFIG: &str = r#"server:
  host: 0.0.0.0
  port: 8080

database:
  driver: sqlite
  dsn: data.db

log:
  level: info
"#;

const CONFIG_EXAMPLE: &str = r#"server:
  host: 0.0.0.0
  port: 8080

database:
  # sqlite or postgres
  driver: sqlite
  dsn: data.db
  # driver: postgres
  # dsn: host=localhost user=postgres password=secret dbname={{PROJECT_NAME}} port=5432 sslmode=disable

log:
  # debug, info, warn, error
  level: info
"#;

const RESPONSE: &str = r#"package http

import (
	"net/http"

	"github.com/gin-gonic/gin"
)

const (
	CodeSuccess      = 0
	CodeBadRequest   = 400
	CodeUnauthorized = 401
	CodeForbidden    = 403
	CodeNotFound     = 404
	CodeInternal     = 500

	// Business codes start at 1000.
	CodeValidation = 1001
	CodeDuplicate  = 1002
	CodeConflict   = 1003
)

// Response is the envelope of every API answer.
type Response struct {
	Code    int    `json:"code"`
	Message string `json:"message"`
	Data    any    `json:"data,omitempty"`
}

func Success(c *gin.Context, data any) {
	c.JSON(http.StatusOK, Response{Code: CodeSuccess, Message: "success", Data: data})
}

func BadRequest(c *gin.Context, message string) {
	c.JSON(http.StatusBadRequest, Response{Code: CodeBadRequest, Message: message})
}

func NotFound(c *gin.Context, message string) {
	c.JSON(http.StatusNotFound, Response{Code: CodeNotFound, Message: message})
}

func InternalError(c *gin.Context, message string) {
	c.JSON(http.StatusInternalServerError, Response{Code: CodeInternal, Message: message})
}

func ValidationError(c *gin.Context, message string) {
	c.JSON(http.StatusBadRequest, Response{Code: CodeValidation, Message: message})
}
"#;

const GITIGNORE: &str = r#"# Binaries
*.exe
*.dll
*.so
*.dylib
*.test
*.out
/bin/
/dist/
vendor/

# Editors
.idea/
.vscode/
*.swp

# Local data
*.db
*.sqlite
*.log
logs/
configs/config.yaml

.DS_Store
"#;

const README: &str = r#"# {{PROJECT_NAME}}

A layered Go service built on the soliton-go framework.

## Getting started

```bash
GOWORK=off go mod tidy
soliton-gen domain User --fields "username,email,status:enum(active|inactive)" --wire
GOWORK=off go run ./cmd/main.go
```

## Layout

```
{{PROJECT_NAME}}/
├── cmd/main.go          entry point and Fx wiring
├── configs/             configuration
└── internal/
    ├── domain/          aggregates, repositories, events
    ├── application/     commands, queries, services
    ├── infrastructure/  persistence
    └── interfaces/      HTTP handlers
```

Each generated domain exposes `POST/GET /api/<resources>` and
`GET/PUT/PATCH/DELETE /api/<resources>/:id`; list endpoints accept
`page` and `page_size` query parameters.
"#;

const MAKEFILE: &str = r#".PHONY: run build test clean tidy gen

GOWORK ?= off

run:
	GOWORK=$(GOWORK) go run ./cmd/main.go

build:
	GOWORK=$(GOWORK) go build -o bin/app ./cmd/main.go

test:
	GOWORK=$(GOWORK) go test ./...

clean:
	rm -rf bin/ dist/

tidy:
	GOWORK=$(GOWORK) go mod tidy

# make gen NAME=User FIELDS="username,email"
gen:
	soliton-gen domain $(NAME) --fields "$(FIELDS)"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn model(replace: Option<&str>) -> ProjectModel<'_> {
        ProjectModel {
            name: "shop",
            module_path: "github.com/soliton-go/shop",
            go_version: "1.22",
            framework_version: "v0.1.0",
            framework_replace: replace,
        }
    }

    #[test]
    fn go_mod_optional_replace() {
        let files = model(None).files();
        let go_mod = &files[0].1;
        assert!(go_mod.starts_with("module github.com/soliton-go/shop\n\ngo 1.22\n"));
        assert!(!go_mod.contains("replace"));

        let files = model(Some("../framework")).files();
        assert!(files[0].1.contains("\nreplace github.com/soliton-go/framework => ../framework\n"));
    }

    #[test]
    fn main_has_every_marker() {
        let files = model(None).files();
        let main = &files[1].1;
        for marker in [
            IMPORTS_MARKER,
            PROVIDERS_MARKER,
            MODULES_MARKER,
            HANDLERS_MARKER,
            ROUTES_MARKER,
        ] {
            assert!(main.contains(marker), "missing {marker}");
        }
        assert!(main.contains("_ \"gorm.io/gorm\""));
        assert!(!main.contains("{{"));
    }

    #[test]
    fn readme_keeps_code_fences() {
        let files = model(None).files();
        let readme = &files.iter().find(|(p, _)| *p == "README.md").unwrap().1;
        assert!(readme.starts_with("# shop\n"));
        assert!(readme.contains("```bash"));
    }
}
