//! Skeletons for a full domain: aggregate, repository, events, persistence,
//! CQRS handlers, DTOs, HTTP handler and the Fx module.

use crate::domain::field::Field;
use crate::domain::identifier::NameVariants;
use crate::domain::templates::{RenderContext, go_imports};
use crate::domain::wiring::{EVENT_HANDLERS_MARKER, SERVICES_MARKER};

const FRAMEWORK: &str = "github.com/soliton-go/framework";

/// Everything the domain skeletons need.
#[derive(Debug, Clone)]
pub struct EntityModel {
    pub names: NameVariants,
    pub module_path: String,
    pub soft_delete: bool,
    pub fields: Vec<Field>,
}

impl EntityModel {
    fn context(&self) -> RenderContext {
        RenderContext::new()
            .with_variable("ENTITY", &self.names.pascal)
            .with_variable("PACKAGE", &self.names.package)
            .with_variable("TABLE", &self.names.table)
            .with_variable("ROUTE", &self.names.route)
            .with_variable("MODULE", &self.module_path)
    }

    fn has_enums(&self) -> bool {
        self.fields.iter().any(Field::is_enum)
    }

    fn uses_time(&self) -> bool {
        self.fields.iter().any(Field::uses_time)
    }

    fn uses_datatypes(&self) -> bool {
        self.fields.iter().any(Field::uses_datatypes)
    }

    fn domain_import(&self) -> String {
        format!("{}/internal/domain/{}", self.module_path, self.names.package)
    }

    fn join<F>(&self, render: F) -> String
    where
        F: Fn(&Field) -> String,
    {
        self.fields.iter().map(render).collect()
    }
}

// ============================================================================
// Domain Layer
// ============================================================================

const ENTITY: &str = r#"package {{PACKAGE}}

import (
{{IMPORTS}})

// {{ENTITY}}ID identifies a {{ENTITY}} aggregate.
type {{ENTITY}}ID string

func (id {{ENTITY}}ID) String() string {
	return string(id)
}
{{ENUMS}}
// {{ENTITY}} is the aggregate root of the {{PACKAGE}} domain.
type {{ENTITY}} struct {
	ddd.BaseAggregateRoot
	ID {{ENTITY}}ID `gorm:"primaryKey"`
{{STRUCT_FIELDS}}	CreatedAt time.Time `gorm:"autoCreateTime"`
	UpdatedAt time.Time `gorm:"autoUpdateTime"`
{{SOFT_DELETE}}}

// TableName maps {{ENTITY}} to its table.
func ({{ENTITY}}) TableName() string {
	return "{{TABLE}}"
}

// New{{ENTITY}} builds a {{ENTITY}} and records its creation event.
func New{{ENTITY}}(id string{{NEW_PARAMS}}) *{{ENTITY}} {
	e := &{{ENTITY}}{
		ID: {{ENTITY}}ID(id),
{{NEW_ASSIGNS}}	}
	e.AddDomainEvent(New{{ENTITY}}CreatedEvent(id))
	return e
}

// Update applies the non-nil values and records an update event.
func (e *{{ENTITY}}) Update({{UPDATE_PARAMS}}) {
{{UPDATE_ASSIGNS}}	e.AddDomainEvent(New{{ENTITY}}UpdatedEvent(string(e.ID)))
}

// GetID returns the aggregate identifier.
func (e *{{ENTITY}}) GetID() ddd.ID {
	return e.ID
}
"#;

pub fn entity(model: &EntityModel) -> String {
    let mut others = vec![format!("{FRAMEWORK}/ddd")];
    if model.soft_delete {
        others.push("gorm.io/gorm".into());
    }
    if model.uses_datatypes() {
        others.push("gorm.io/datatypes".into());
    }

    let enums = model.join(|f| {
        let Some(enum_type) = &f.enum_type else {
            return String::new();
        };
        let consts: String = f
            .enum_constants()
            .iter()
            .map(|(name, value)| format!("\t{name} {enum_type} = \"{value}\"\n"))
            .collect();
        format!(
            "\n// {enum_type} enumerates the allowed {} values.\n\
             type {enum_type} string\n\nconst (\n{consts})\n",
            f.name
        )
    });

    let struct_fields = model.join(|f| {
        let mut line = format!("\t{} {}", f.name, f.go_type);
        if !f.gorm_tag.is_empty() {
            line.push(' ');
            line.push_str(&f.gorm_tag);
        }
        if let Some(comment) = &f.comment {
            line.push_str(&format!(" // {comment}"));
        }
        line.push('\n');
        line
    });

    let update_params = model
        .fields
        .iter()
        .map(|f| format!("{} {}", f.camel, f.optional_go_type()))
        .collect::<Vec<_>>()
        .join(", ");

    let update_assigns = model.join(|f| {
        let deref = if f.is_pointer() { "" } else { "*" };
        format!(
            "\tif {camel} != nil {{\n\t\te.{name} = {deref}{camel}\n\t}}\n",
            camel = f.camel,
            name = f.name
        )
    });

    model
        .context()
        .with_variable("IMPORTS", go_imports(&["time"], &others))
        .with_variable("ENUMS", enums)
        .with_variable("STRUCT_FIELDS", struct_fields)
        .with_variable(
            "SOFT_DELETE",
            if model.soft_delete {
                "\tDeletedAt gorm.DeletedAt `gorm:\"index\"`\n"
            } else {
                ""
            },
        )
        .with_variable("NEW_PARAMS", model.join(|f| format!(", {} {}", f.camel, f.go_type)))
        .with_variable("NEW_ASSIGNS", model.join(|f| format!("\t\t{}: {},\n", f.name, f.camel)))
        .with_variable("UPDATE_PARAMS", update_params)
        .with_variable("UPDATE_ASSIGNS", update_assigns)
        .render(ENTITY)
}

const REPOSITORY: &str = r#"package {{PACKAGE}}

import (
	"context"

	"github.com/soliton-go/framework/orm"
)

// {{ENTITY}}Repository persists {{ENTITY}} aggregates.
type {{ENTITY}}Repository interface {
	orm.Repository[*{{ENTITY}}, {{ENTITY}}ID]
	// FindPaginated returns one page of aggregates plus the total count.
	FindPaginated(ctx context.Context, page, pageSize int) ([]*{{ENTITY}}, int64, error)
}
"#;

pub fn repository(model: &EntityModel) -> String {
    model.context().render(REPOSITORY)
}

const EVENTS: &str = r#"package {{PACKAGE}}

import (
	"time"

	"github.com/soliton-go/framework/ddd"
	"github.com/soliton-go/framework/event"
)

// {{ENTITY}}CreatedEvent is raised after a {{ENTITY}} is created.
type {{ENTITY}}CreatedEvent struct {
	ddd.BaseDomainEvent
	{{ENTITY}}ID string `json:"{{PACKAGE}}_id"`
}

func (e {{ENTITY}}CreatedEvent) EventName() string {
	return "{{PACKAGE}}.created"
}

func New{{ENTITY}}CreatedEvent(id string) {{ENTITY}}CreatedEvent {
	return {{ENTITY}}CreatedEvent{
		BaseDomainEvent: ddd.NewBaseDomainEvent(),
		{{ENTITY}}ID: id,
	}
}

// {{ENTITY}}UpdatedEvent is raised after a {{ENTITY}} changes.
type {{ENTITY}}UpdatedEvent struct {
	ddd.BaseDomainEvent
	{{ENTITY}}ID string `json:"{{PACKAGE}}_id"`
}

func (e {{ENTITY}}UpdatedEvent) EventName() string {
	return "{{PACKAGE}}.updated"
}

func New{{ENTITY}}UpdatedEvent(id string) {{ENTITY}}UpdatedEvent {
	return {{ENTITY}}UpdatedEvent{
		BaseDomainEvent: ddd.NewBaseDomainEvent(),
		{{ENTITY}}ID: id,
	}
}

// {{ENTITY}}DeletedEvent is raised after a {{ENTITY}} is removed.
type {{ENTITY}}DeletedEvent struct {
	ddd.BaseDomainEvent
	{{ENTITY}}ID string `json:"{{PACKAGE}}_id"`
	DeletedAt time.Time `json:"deleted_at"`
}

func (e {{ENTITY}}DeletedEvent) EventName() string {
	return "{{PACKAGE}}.deleted"
}

func New{{ENTITY}}DeletedEvent(id string) {{ENTITY}}DeletedEvent {
	return {{ENTITY}}DeletedEvent{
		BaseDomainEvent: ddd.NewBaseDomainEvent(),
		{{ENTITY}}ID: id,
		DeletedAt: time.Now(),
	}
}

func init() {
	event.RegisterEvent("{{PACKAGE}}.created", func() ddd.DomainEvent {
		return &{{ENTITY}}CreatedEvent{}
	})
	event.RegisterEvent("{{PACKAGE}}.updated", func() ddd.DomainEvent {
		return &{{ENTITY}}UpdatedEvent{}
	})
	event.RegisterEvent("{{PACKAGE}}.deleted", func() ddd.DomainEvent {
		return &{{ENTITY}}DeletedEvent{}
	})
}
"#;

pub fn events(model: &EntityModel) -> String {
    model.context().render(EVENTS)
}

// ============================================================================
// Infrastructure Layer
// ============================================================================

const REPOSITORY_IMPL: &str = r#"package persistence

import (
	"context"

	"{{MODULE}}/internal/domain/{{PACKAGE}}"
	"github.com/soliton-go/framework/orm"
	"gorm.io/gorm"
)

type {{ENTITY}}RepoImpl struct {
	*orm.GormRepository[*{{PACKAGE}}.{{ENTITY}}, {{PACKAGE}}.{{ENTITY}}ID]
	db *gorm.DB
}

func New{{ENTITY}}Repository(db *gorm.DB) {{PACKAGE}}.{{ENTITY}}Repository {
	return &{{ENTITY}}RepoImpl{
		GormRepository: orm.NewGormRepository[*{{PACKAGE}}.{{ENTITY}}, {{PACKAGE}}.{{ENTITY}}ID](db),
		db:             db,
	}
}

// FindPaginated returns one page of aggregates plus the total count.
func (r *{{ENTITY}}RepoImpl) FindPaginated(ctx context.Context, page, pageSize int) ([]*{{PACKAGE}}.{{ENTITY}}, int64, error) {
	var entities []*{{PACKAGE}}.{{ENTITY}}
	var total int64

	if err := r.db.WithContext(ctx).Model(&{{PACKAGE}}.{{ENTITY}}{}).Count(&total).Error; err != nil {
		return nil, 0, err
	}

	offset := (page - 1) * pageSize
	if err := r.db.WithContext(ctx).Offset(offset).Limit(pageSize).Find(&entities).Error; err != nil {
		return nil, 0, err
	}

	return entities, total, nil
}

// Migrate{{ENTITY}} creates or updates the {{TABLE}} table.
func Migrate{{ENTITY}}(db *gorm.DB) error {
	return db.AutoMigrate(&{{PACKAGE}}.{{ENTITY}}{})
}
"#;

pub fn repository_impl(model: &EntityModel) -> String {
    model.context().render(REPOSITORY_IMPL)
}

// ============================================================================
// Application Layer
// ============================================================================

const COMMANDS: &str = r#"package {{PACKAGE}}app

import (
{{IMPORTS}})

// Create{{ENTITY}}Command carries the data for a new {{ENTITY}}.
type Create{{ENTITY}}Command struct {
	ID string
{{CREATE_FIELDS}}}

type Create{{ENTITY}}Handler struct {
	repo {{PACKAGE}}.{{ENTITY}}Repository
}

func NewCreate{{ENTITY}}Handler(repo {{PACKAGE}}.{{ENTITY}}Repository) *Create{{ENTITY}}Handler {
	return &Create{{ENTITY}}Handler{repo: repo}
}

func (h *Create{{ENTITY}}Handler) Handle(ctx context.Context, cmd Create{{ENTITY}}Command) (*{{PACKAGE}}.{{ENTITY}}, error) {
	entity := {{PACKAGE}}.New{{ENTITY}}(cmd.ID{{CREATE_ARGS}})
	if err := h.repo.Save(ctx, entity); err != nil {
		return nil, err
	}
	return entity, nil
}

// Update{{ENTITY}}Command carries a partial update; nil fields are left unchanged.
type Update{{ENTITY}}Command struct {
	ID string
{{UPDATE_FIELDS}}}

type Update{{ENTITY}}Handler struct {
	repo {{PACKAGE}}.{{ENTITY}}Repository
}

func NewUpdate{{ENTITY}}Handler(repo {{PACKAGE}}.{{ENTITY}}Repository) *Update{{ENTITY}}Handler {
	return &Update{{ENTITY}}Handler{repo: repo}
}

func (h *Update{{ENTITY}}Handler) Handle(ctx context.Context, cmd Update{{ENTITY}}Command) (*{{PACKAGE}}.{{ENTITY}}, error) {
	entity, err := h.repo.Find(ctx, {{PACKAGE}}.{{ENTITY}}ID(cmd.ID))
	if err != nil {
		return nil, err
	}
	entity.Update({{UPDATE_ARGS}})
	if err := h.repo.Save(ctx, entity); err != nil {
		return nil, err
	}
	return entity, nil
}

// Delete{{ENTITY}}Command identifies the {{ENTITY}} to remove.
type Delete{{ENTITY}}Command struct {
	ID string
}

type Delete{{ENTITY}}Handler struct {
	repo {{PACKAGE}}.{{ENTITY}}Repository
}

func NewDelete{{ENTITY}}Handler(repo {{PACKAGE}}.{{ENTITY}}Repository) *Delete{{ENTITY}}Handler {
	return &Delete{{ENTITY}}Handler{repo: repo}
}

func (h *Delete{{ENTITY}}Handler) Handle(ctx context.Context, cmd Delete{{ENTITY}}Command) error {
	return h.repo.Delete(ctx, {{PACKAGE}}.{{ENTITY}}ID(cmd.ID))
}
"#;

pub fn commands(model: &EntityModel) -> String {
    let mut std = vec!["context"];
    if model.uses_time() {
        std.push("time");
    }
    let mut others = vec![model.domain_import()];
    if model.uses_datatypes() {
        others.push("gorm.io/datatypes".into());
    }

    model
        .context()
        .with_variable("IMPORTS", go_imports(&std, &others))
        .with_variable(
            "CREATE_FIELDS",
            model.join(|f| format!("\t{} {}\n", f.name, f.app_go_type)),
        )
        .with_variable("CREATE_ARGS", model.join(|f| format!(", cmd.{}", f.name)))
        .with_variable(
            "UPDATE_FIELDS",
            model.join(|f| format!("\t{} {}\n", f.name, f.optional_app_type())),
        )
        .with_variable(
            "UPDATE_ARGS",
            model
                .fields
                .iter()
                .map(|f| format!("cmd.{}", f.name))
                .collect::<Vec<_>>()
                .join(", "),
        )
        .render(COMMANDS)
}

const QUERIES: &str = r#"package {{PACKAGE}}app

import (
	"context"

	"{{MODULE}}/internal/domain/{{PACKAGE}}"
)

// Get{{ENTITY}}Query loads a single {{ENTITY}}.
type Get{{ENTITY}}Query struct {
	ID string
}

type Get{{ENTITY}}Handler struct {
	repo {{PACKAGE}}.{{ENTITY}}Repository
}

func NewGet{{ENTITY}}Handler(repo {{PACKAGE}}.{{ENTITY}}Repository) *Get{{ENTITY}}Handler {
	return &Get{{ENTITY}}Handler{repo: repo}
}

func (h *Get{{ENTITY}}Handler) Handle(ctx context.Context, query Get{{ENTITY}}Query) (*{{PACKAGE}}.{{ENTITY}}, error) {
	return h.repo.Find(ctx, {{PACKAGE}}.{{ENTITY}}ID(query.ID))
}

// List{{ENTITY}}sQuery pages through {{ENTITY}} aggregates.
type List{{ENTITY}}sQuery struct {
	Page     int // 1-based
	PageSize int // defaults to 20, capped at 100
}

type List{{ENTITY}}sResult struct {
	Items      []*{{PACKAGE}}.{{ENTITY}}
	Total      int64
	Page       int
	PageSize   int
	TotalPages int
}

type List{{ENTITY}}sHandler struct {
	repo {{PACKAGE}}.{{ENTITY}}Repository
}

func NewList{{ENTITY}}sHandler(repo {{PACKAGE}}.{{ENTITY}}Repository) *List{{ENTITY}}sHandler {
	return &List{{ENTITY}}sHandler{repo: repo}
}

func (h *List{{ENTITY}}sHandler) Handle(ctx context.Context, query List{{ENTITY}}sQuery) (*List{{ENTITY}}sResult, error) {
	page := query.Page
	if page < 1 {
		page = 1
	}
	pageSize := query.PageSize
	if pageSize < 1 {
		pageSize = 20
	}
	if pageSize > 100 {
		pageSize = 100
	}

	items, total, err := h.repo.FindPaginated(ctx, page, pageSize)
	if err != nil {
		return nil, err
	}

	totalPages := int(total) / pageSize
	if int(total)%pageSize > 0 {
		totalPages++
	}

	return &List{{ENTITY}}sResult{
		Items:      items,
		Total:      total,
		Page:       page,
		PageSize:   pageSize,
		TotalPages: totalPages,
	}, nil
}
"#;

pub fn queries(model: &EntityModel) -> String {
    model.context().render(QUERIES)
}

const DTO: &str = r#"package {{PACKAGE}}app

import (
{{IMPORTS}})

// Create{{ENTITY}}Request is the JSON body accepted when creating a {{ENTITY}}.
type Create{{ENTITY}}Request struct {
{{CREATE_FIELDS}}}

// Update{{ENTITY}}Request is the JSON body accepted when updating a {{ENTITY}}.
type Update{{ENTITY}}Request struct {
{{UPDATE_FIELDS}}}

// {{ENTITY}}Response is the JSON representation of a {{ENTITY}}.
type {{ENTITY}}Response struct {
	ID string `json:"id"`
{{RESPONSE_FIELDS}}	CreatedAt time.Time `json:"created_at"`
	UpdatedAt time.Time `json:"updated_at"`
}

func To{{ENTITY}}Response(e *{{PACKAGE}}.{{ENTITY}}) {{ENTITY}}Response {
	return {{ENTITY}}Response{
		ID: string(e.ID),
{{RESPONSE_ASSIGNS}}		CreatedAt: e.CreatedAt,
		UpdatedAt: e.UpdatedAt,
	}
}

func To{{ENTITY}}ResponseList(entities []*{{PACKAGE}}.{{ENTITY}}) []{{ENTITY}}Response {
	result := make([]{{ENTITY}}Response, len(entities))
	for i, e := range entities {
		result[i] = To{{ENTITY}}Response(e)
	}
	return result
}
"#;

pub fn dto(model: &EntityModel) -> String {
    let mut others = vec![model.domain_import()];
    if model.uses_datatypes() {
        others.push("gorm.io/datatypes".into());
    }

    let plain_type = |f: &Field| {
        if f.is_enum() {
            "string".to_string()
        } else {
            f.app_go_type.clone()
        }
    };

    model
        .context()
        .with_variable("IMPORTS", go_imports(&["time"], &others))
        .with_variable(
            "CREATE_FIELDS",
            model.join(|f| {
                format!(
                    "\t{} {} `json:\"{}\"{}`\n",
                    f.name,
                    plain_type(f),
                    f.snake,
                    f.create_binding()
                )
            }),
        )
        .with_variable(
            "UPDATE_FIELDS",
            model.join(|f| {
                let ty = if f.is_enum() {
                    "*string".to_string()
                } else {
                    f.optional_app_type()
                };
                format!(
                    "\t{} {} `json:\"{},omitempty\"{}`\n",
                    f.name,
                    ty,
                    f.snake,
                    f.update_binding()
                )
            }),
        )
        .with_variable(
            "RESPONSE_FIELDS",
            model.join(|f| format!("\t{} {} {}\n", f.name, plain_type(f), f.json_tag)),
        )
        .with_variable(
            "RESPONSE_ASSIGNS",
            model.join(|f| {
                if f.is_enum() {
                    format!("\t\t{name}: string(e.{name}),\n", name = f.name)
                } else {
                    format!("\t\t{name}: e.{name},\n", name = f.name)
                }
            }),
        )
        .render(DTO)
}

const MODULE: &str = r#"package {{PACKAGE}}app

import (
	"go.uber.org/fx"
	"gorm.io/gorm"

	"{{MODULE}}/internal/domain/{{PACKAGE}}"
	"{{MODULE}}/internal/infrastructure/persistence"
)

// Module wires the {{ENTITY}} repository and handlers into Fx.
var Module = fx.Options(
	fx.Provide(func(db *gorm.DB) {{PACKAGE}}.{{ENTITY}}Repository {
		return persistence.New{{ENTITY}}Repository(db)
	}),

	fx.Provide(NewCreate{{ENTITY}}Handler),
	fx.Provide(NewUpdate{{ENTITY}}Handler),
	fx.Provide(NewDelete{{ENTITY}}Handler),
	fx.Provide(NewGet{{ENTITY}}Handler),
	fx.Provide(NewList{{ENTITY}}sHandler),

{{SERVICES_MARKER}}
{{EVENT_HANDLERS_MARKER}}
)

// RegisterMigration migrates the {{ENTITY}} table.
func RegisterMigration(db *gorm.DB) error {
	return persistence.Migrate{{ENTITY}}(db)
}
"#;

pub fn module(model: &EntityModel) -> String {
    model
        .context()
        .with_variable("SERVICES_MARKER", SERVICES_MARKER)
        .with_variable("EVENT_HANDLERS_MARKER", EVENT_HANDLERS_MARKER)
        .render(MODULE)
}

// ============================================================================
// Interface Layer
// ============================================================================

pub const HTTP_HELPERS: &str = r#"package http

// EnumPtr converts an optional raw string into an optional enum value.
func EnumPtr[T any](v *string, parse func(string) T) *T {
	if v == nil {
		return nil
	}
	parsed := parse(*v)
	return &parsed
}
"#;

const HANDLER: &str = r#"package http

import (
{{IMPORTS}})

// {{ENTITY}}Handler exposes {{ENTITY}} over HTTP.
type {{ENTITY}}Handler struct {
	createHandler *{{PACKAGE}}app.Create{{ENTITY}}Handler
	updateHandler *{{PACKAGE}}app.Update{{ENTITY}}Handler
	deleteHandler *{{PACKAGE}}app.Delete{{ENTITY}}Handler
	getHandler    *{{PACKAGE}}app.Get{{ENTITY}}Handler
	listHandler   *{{PACKAGE}}app.List{{ENTITY}}sHandler
}

func New{{ENTITY}}Handler(
	createHandler *{{PACKAGE}}app.Create{{ENTITY}}Handler,
	updateHandler *{{PACKAGE}}app.Update{{ENTITY}}Handler,
	deleteHandler *{{PACKAGE}}app.Delete{{ENTITY}}Handler,
	getHandler *{{PACKAGE}}app.Get{{ENTITY}}Handler,
	listHandler *{{PACKAGE}}app.List{{ENTITY}}sHandler,
) *{{ENTITY}}Handler {
	return &{{ENTITY}}Handler{
		createHandler: createHandler,
		updateHandler: updateHandler,
		deleteHandler: deleteHandler,
		getHandler:    getHandler,
		listHandler:   listHandler,
	}
}

// RegisterRoutes mounts the {{ENTITY}} endpoints under /api/{{ROUTE}}.
func (h *{{ENTITY}}Handler) RegisterRoutes(r *gin.Engine) {
	api := r.Group("/api/{{ROUTE}}")
	{
		api.POST("", h.Create)
		api.GET("", h.List)
		api.GET("/:id", h.Get)
		api.PUT("/:id", h.Update)
		api.PATCH("/:id", h.Update)
		api.DELETE("/:id", h.Delete)
	}
}

// Create handles POST /api/{{ROUTE}}
func (h *{{ENTITY}}Handler) Create(c *gin.Context) {
	var req {{PACKAGE}}app.Create{{ENTITY}}Request
	if err := c.ShouldBindJSON(&req); err != nil {
		BadRequest(c, err.Error())
		return
	}

	cmd := {{PACKAGE}}app.Create{{ENTITY}}Command{
		ID: uuid.New().String(),
{{CREATE_ASSIGNS}}	}

	entity, err := h.createHandler.Handle(c.Request.Context(), cmd)
	if err != nil {
		InternalError(c, err.Error())
		return
	}

	Success(c, {{PACKAGE}}app.To{{ENTITY}}Response(entity))
}

// Get handles GET /api/{{ROUTE}}/:id
func (h *{{ENTITY}}Handler) Get(c *gin.Context) {
	id := c.Param("id")

	entity, err := h.getHandler.Handle(c.Request.Context(), {{PACKAGE}}app.Get{{ENTITY}}Query{ID: id})
	if err != nil {
		NotFound(c, "{{PACKAGE}} not found")
		return
	}

	Success(c, {{PACKAGE}}app.To{{ENTITY}}Response(entity))
}

// List handles GET /api/{{ROUTE}}?page=1&page_size=20
func (h *{{ENTITY}}Handler) List(c *gin.Context) {
	page, _ := strconv.Atoi(c.DefaultQuery("page", "1"))
	pageSize, _ := strconv.Atoi(c.DefaultQuery("page_size", "20"))

	result, err := h.listHandler.Handle(c.Request.Context(), {{PACKAGE}}app.List{{ENTITY}}sQuery{
		Page:     page,
		PageSize: pageSize,
	})
	if err != nil {
		InternalError(c, err.Error())
		return
	}

	Success(c, gin.H{
		"items":       {{PACKAGE}}app.To{{ENTITY}}ResponseList(result.Items),
		"total":       result.Total,
		"page":        result.Page,
		"page_size":   result.PageSize,
		"total_pages": result.TotalPages,
	})
}

// Update handles PUT and PATCH /api/{{ROUTE}}/:id
func (h *{{ENTITY}}Handler) Update(c *gin.Context) {
	id := c.Param("id")

	var req {{PACKAGE}}app.Update{{ENTITY}}Request
	if err := c.ShouldBindJSON(&req); err != nil {
		BadRequest(c, err.Error())
		return
	}

	cmd := {{PACKAGE}}app.Update{{ENTITY}}Command{
		ID: id,
{{UPDATE_ASSIGNS}}	}

	entity, err := h.updateHandler.Handle(c.Request.Context(), cmd)
	if err != nil {
		InternalError(c, err.Error())
		return
	}

	Success(c, {{PACKAGE}}app.To{{ENTITY}}Response(entity))
}

// Delete handles DELETE /api/{{ROUTE}}/:id
func (h *{{ENTITY}}Handler) Delete(c *gin.Context) {
	id := c.Param("id")

	if err := h.deleteHandler.Handle(c.Request.Context(), {{PACKAGE}}app.Delete{{ENTITY}}Command{ID: id}); err != nil {
		InternalError(c, err.Error())
		return
	}

	Success(c, nil)
}
"#;

pub fn handler(model: &EntityModel) -> String {
    let package = &model.names.package;
    let mut others = vec![
        "github.com/gin-gonic/gin".to_string(),
        "github.com/google/uuid".to_string(),
        format!(
            "{package}app \"{}/internal/application/{package}\"",
            model.module_path
        ),
    ];
    if model.has_enums() {
        others.push(model.domain_import());
    }

    let enum_type = |f: &Field| {
        format!("{package}.{}", f.enum_type.clone().unwrap_or_default())
    };

    model
        .context()
        .with_variable("IMPORTS", go_imports(&["strconv"], &others))
        .with_variable(
            "CREATE_ASSIGNS",
            model.join(|f| {
                if f.is_enum() {
                    format!("\t\t{name}: {}(req.{name}),\n", enum_type(f), name = f.name)
                } else {
                    format!("\t\t{name}: req.{name},\n", name = f.name)
                }
            }),
        )
        .with_variable(
            "UPDATE_ASSIGNS",
            model.join(|f| {
                if f.is_enum() {
                    let ty = enum_type(f);
                    format!(
                        "\t\t{name}: EnumPtr(req.{name}, \
                         func(v string) {ty} {{ return {ty}(v) }}),\n",
                        name = f.name
                    )
                } else {
                    format!("\t\t{name}: req.{name},\n", name = f.name)
                }
            }),
        )
        .render(HANDLER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::field::{FieldConfig, ReservedFields};
    use crate::domain::identifier::Identifier;

    fn model(soft_delete: bool, fields: Vec<FieldConfig>) -> EntityModel {
        let id = Identifier::new("Order").unwrap();
        let names = id.derive();
        let fields =
            Field::resolve_all(&fields, &names.pascal, &names.package, ReservedFields::Skip)
                .unwrap();
        EntityModel {
            names,
            module_path: "example.com/shop".into(),
            soft_delete,
            fields,
        }
    }

    #[test]
    fn entity_soft_delete_adds_gorm_and_deleted_at() {
        let src = entity(&model(true, vec![FieldConfig::new("amount", "decimal")]));
        assert!(src.contains("\t\"gorm.io/gorm\"\n"));
        assert!(src.contains("DeletedAt gorm.DeletedAt `gorm:\"index\"`"));
        assert!(src.contains("\tAmount float64 `gorm:\"type:decimal(10,2);default:0\"`\n"));
        assert!(src.contains("func NewOrder(id string, amount float64) *Order {"));
        assert!(src.contains("func (e *Order) Update(amount *float64) {"));
        assert!(src.contains("return \"orders\""));

        let plain = entity(&model(false, vec![FieldConfig::new("amount", "decimal")]));
        assert!(!plain.contains("gorm.io/gorm"));
        assert!(!plain.contains("DeletedAt"));
    }

    #[test]
    fn entity_renders_enum_block() {
        let src = entity(&model(
            false,
            vec![FieldConfig::enumeration("status", ["pending", "in-review"])],
        ));
        assert!(src.contains("type OrderStatus string"));
        assert!(src.contains("\tOrderStatusPending OrderStatus = \"pending\"\n"));
        assert!(src.contains("\tOrderStatusInReview OrderStatus = \"in-review\"\n"));
        assert!(src.contains("func (e *Order) Update(status *OrderStatus) {"));
        assert!(!src.contains("{{"));
    }

    #[test]
    fn pointer_fields_are_not_double_wrapped() {
        let src = entity(&model(false, vec![FieldConfig::new("paid_at", "time?")]));
        assert!(src.contains("Update(paidAt *time.Time)"));
        assert!(src.contains("\t\te.PaidAt = paidAt\n"));
        assert!(src.contains("\tPaidAt *time.Time\n"));
    }

    #[test]
    fn dto_and_commands_use_domain_types() {
        let m = model(
            false,
            vec![
                FieldConfig::new("title", "string"),
                FieldConfig::enumeration("status", ["a", "b"]),
                FieldConfig::new("due", "time"),
            ],
        );
        let dto = dto(&m);
        assert!(dto.contains("\tTitle string `json:\"title\" binding:\"required\"`\n"));
        assert!(dto.contains(
            "\tStatus *string `json:\"status,omitempty\" \
             binding:\"omitempty,oneof=a b\"`\n"
        ));
        assert!(dto.contains("\t\tStatus: string(e.Status),\n"));

        let cmds = commands(&m);
        assert!(cmds.contains("\t\"time\"\n"));
        assert!(cmds.contains("\tStatus order.OrderStatus\n"));
        assert!(cmds.contains("\tStatus *order.OrderStatus\n"));
        assert!(cmds.contains("entity.Update(cmd.Title, cmd.Status, cmd.Due)"));
    }

    #[test]
    fn handler_converts_enums() {
        let m = model(false, vec![FieldConfig::enumeration("status", ["a"])]);
        let src = handler(&m);
        assert!(src.contains("\torderapp \"example.com/shop/internal/application/order\"\n"));
        assert!(src.contains("\t\"example.com/shop/internal/domain/order\"\n"));
        assert!(src.contains("\t\tStatus: order.OrderStatus(req.Status),\n"));
        assert!(src.contains(
            "EnumPtr(req.Status, func(v string) order.OrderStatus { return order.OrderStatus(v) })"
        ));
        assert!(src.contains("r.Group(\"/api/orders\")"));
    }

    #[test]
    fn module_carries_markers() {
        let src = module(&model(false, vec![FieldConfig::new("x", "int")]));
        assert!(src.contains(SERVICES_MARKER));
        assert!(src.contains(EVENT_HANDLERS_MARKER));
        assert!(src.contains("persistence.MigrateOrder(db)"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let m = model(true, vec![FieldConfig::enumeration("kind", ["x", "y"])]);
        assert_eq!(entity(&m), entity(&m));
        assert_eq!(handler(&m), handler(&m));
    }
}
