//! Ticket creation flow.
//!
//! `TicketForm` holds what the user typed, `submit_ticket` validates it and
//! calls the backend, and `CreateModal` is the modal's state machine:
//!
//! ```text
//! Closed -> Editing -> Submitting -> Closed
//!              ^            |
//!              +-- failure -+
//! ```

use std::fmt;

use crate::backend::{CreateTicketRequest, TicketBackend};
use crate::error::{HelpdeskError, Result};
use crate::types::{IssueType, Organization, Ticket, User};

pub const CREATED_MESSAGE: &str = "Ticket created successfully";
pub const CREATE_FAILED_FALLBACK: &str = "Failed to create ticket";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    ClientFileNo,
    MobileNo,
    NameOfClient,
    IssueType,
    Description,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::ClientFileNo,
        FormField::MobileNo,
        FormField::NameOfClient,
        FormField::IssueType,
        FormField::Description,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::ClientFileNo => "Client File No",
            FormField::MobileNo => "Mobile No",
            FormField::NameOfClient => "Name of Client",
            FormField::IssueType => "Issue Type",
            FormField::Description => "Description",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.label(), self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketForm {
    pub client_file_no: String,
    pub mobile_no: String,
    pub name_of_client: String,
    pub issue_type: Option<IssueType>,
    pub description: String,
}

impl TicketForm {
    /// Pre-fill client details from an existing ticket.
    pub fn from_ticket(ticket: &Ticket) -> Self {
        Self {
            client_file_no: ticket.client_file_no.clone(),
            mobile_no: ticket.mobile_no.clone(),
            name_of_client: ticket.name_of_client.clone(),
            issue_type: None,
            description: String::new(),
        }
    }

    /// Text of a free-text field; `None` for the issue type selector.
    pub fn text(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::ClientFileNo => Some(&self.client_file_no),
            FormField::MobileNo => Some(&self.mobile_no),
            FormField::NameOfClient => Some(&self.name_of_client),
            FormField::Description => Some(&self.description),
            FormField::IssueType => None,
        }
    }

    pub fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::ClientFileNo => Some(&mut self.client_file_no),
            FormField::MobileNo => Some(&mut self.mobile_no),
            FormField::NameOfClient => Some(&mut self.name_of_client),
            FormField::Description => Some(&mut self.description),
            FormField::IssueType => None,
        }
    }

    /// All fields are required and must be non-blank.
    pub fn validate(&self) -> std::result::Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        for field in FormField::ALL {
            let missing = match self.text(field) {
                Some(text) => text.trim().is_empty(),
                None => self.issue_type.is_none(),
            };
            if missing {
                errors.push(FieldError {
                    field,
                    message: "is required".to_string(),
                });
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Build the procedure arguments. Call only after `validate` succeeds.
    pub fn to_request(&self, organization_id: &str, opened_by: &str) -> Result<CreateTicketRequest> {
        let issue_type = self
            .issue_type
            .ok_or_else(|| HelpdeskError::Validation("Issue Type: is required".to_string()))?;
        Ok(CreateTicketRequest {
            p_opened_by: opened_by.to_string(),
            p_client_file_no: self.client_file_no.trim().to_string(),
            p_mobile_no: self.mobile_no.trim().to_string(),
            p_name_of_client: self.name_of_client.trim().to_string(),
            p_issue_type: issue_type,
            p_description: self.description.trim().to_string(),
            p_organization_id: organization_id.to_string(),
        })
    }
}

fn validation_error(errors: &[FieldError]) -> HelpdeskError {
    HelpdeskError::Validation(
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; "),
    )
}

/// Validate, check the session, then invoke the backend exactly once.
///
/// Validation failures return before any backend call.
pub async fn submit_ticket(
    form: &TicketForm,
    organization: &Organization,
    user: Option<&User>,
    backend: &dyn TicketBackend,
) -> Result<Ticket> {
    form.validate().map_err(|errors| validation_error(&errors))?;
    let user = user.ok_or(HelpdeskError::NotAuthenticated)?;
    let request = form.to_request(&organization.id, &user.email)?;
    backend.create_ticket(&request).await
}

/// Form plus per-field errors and the last submission error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalForm {
    pub form: TicketForm,
    pub focus: FormField,
    pub field_errors: Vec<FieldError>,
    pub error: Option<String>,
}

impl ModalForm {
    fn new(form: TicketForm) -> Self {
        // Pre-filled forms start on the first empty field
        let focus = FormField::ALL
            .into_iter()
            .find(|f| form.text(*f).is_some_and(|t| t.is_empty()) || (*f == FormField::IssueType && form.issue_type.is_none()))
            .unwrap_or(FormField::ClientFileNo);
        Self {
            form,
            focus,
            field_errors: Vec::new(),
            error: None,
        }
    }

    pub fn field_error(&self, field: FormField) -> Option<&str> {
        self.field_errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CreateModal {
    #[default]
    Closed,
    Editing(ModalForm),
    Submitting(ModalForm),
}

impl CreateModal {
    pub fn is_open(&self) -> bool {
        !matches!(self, CreateModal::Closed)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, CreateModal::Submitting(_))
    }

    pub fn form(&self) -> Option<&ModalForm> {
        match self {
            CreateModal::Closed => None,
            CreateModal::Editing(form) | CreateModal::Submitting(form) => Some(form),
        }
    }

    /// Editable form, or `None` while closed or submitting.
    pub fn editing_mut(&mut self) -> Option<&mut ModalForm> {
        match self {
            CreateModal::Editing(form) => Some(form),
            _ => None,
        }
    }

    pub fn open_blank() -> Self {
        CreateModal::Editing(ModalForm::new(TicketForm::default()))
    }

    pub fn open_from_ticket(ticket: &Ticket) -> Self {
        CreateModal::Editing(ModalForm::new(TicketForm::from_ticket(ticket)))
    }

    /// Move to `Submitting` when the form is valid.
    ///
    /// Returns the form to send. An invalid form stays in `Editing` with field
    /// errors; a modal that is already submitting returns `None` so a second
    /// request is never issued.
    pub fn begin_submit(&mut self) -> Option<TicketForm> {
        let CreateModal::Editing(modal) = self else {
            return None;
        };
        match modal.form.validate() {
            Ok(()) => {
                let mut modal = modal.clone();
                modal.field_errors.clear();
                modal.error = None;
                let form = modal.form.clone();
                *self = CreateModal::Submitting(modal);
                Some(form)
            }
            Err(errors) => {
                modal.focus = errors[0].field;
                modal.field_errors = errors;
                None
            }
        }
    }

    /// Success closes the modal and drops the entered data.
    pub fn submit_succeeded(&mut self) {
        if self.is_submitting() {
            *self = CreateModal::Closed;
        }
    }

    /// Failure returns to editing with the data intact.
    pub fn submit_failed(&mut self, message: impl Into<String>) {
        if let CreateModal::Submitting(modal) = self {
            let mut modal = modal.clone();
            modal.error = Some(message.into());
            *self = CreateModal::Editing(modal);
        }
    }

    /// Cancel is ignored while a submission is in flight.
    pub fn cancel(&mut self) {
        if !self.is_submitting() {
            *self = CreateModal::Closed;
        }
    }
}

/// Toast text for a failed creation.
pub fn failure_message(error: &HelpdeskError) -> String {
    let message = error.user_message();
    if message.trim().is_empty() {
        CREATE_FAILED_FALLBACK.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> TicketForm {
        TicketForm {
            client_file_no: "CF-1".to_string(),
            mobile_no: "555-0100".to_string(),
            name_of_client: "Jane Roe".to_string(),
            issue_type: Some(IssueType::Technical),
            description: "Printer on fire".to_string(),
        }
    }

    #[test]
    fn test_validate_reports_each_missing_field() {
        let errors = TicketForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 5);
        let form = TicketForm {
            description: "   ".to_string(),
            ..filled()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, FormField::Description);
    }

    #[test]
    fn test_to_request_trims_fields() {
        let form = TicketForm {
            name_of_client: "  Jane Roe ".to_string(),
            ..filled()
        };
        let request = form.to_request("org-1", "staff@example.com").unwrap();
        assert_eq!(request.p_name_of_client, "Jane Roe");
        assert_eq!(request.p_organization_id, "org-1");
        assert_eq!(request.p_opened_by, "staff@example.com");
    }

    #[test]
    fn test_field_focus_cycles() {
        assert_eq!(FormField::Description.next(), FormField::ClientFileNo);
        assert_eq!(FormField::ClientFileNo.prev(), FormField::Description);
    }

    #[test]
    fn test_open_from_ticket_focuses_first_empty_field() {
        let ticket = Ticket {
            id: "t".to_string(),
            ticket_no: "TKT-1".to_string(),
            client_file_no: "CF-1".to_string(),
            mobile_no: "555".to_string(),
            name_of_client: "Jane".to_string(),
            issue_type: IssueType::Billing,
            description: "old".to_string(),
            status: crate::types::TicketStatus::Open,
            created_on: jiff::Timestamp::UNIX_EPOCH,
            organization_id: "org".to_string(),
            assignee: None,
            opened_by: None,
        };
        let modal = CreateModal::open_from_ticket(&ticket);
        let form = modal.form().unwrap();
        assert_eq!(form.form.client_file_no, "CF-1");
        assert_eq!(form.form.description, "");
        assert_eq!(form.focus, FormField::IssueType);
    }

    #[test]
    fn test_modal_transitions() {
        let mut modal = CreateModal::open_blank();
        assert!(modal.begin_submit().is_none());
        assert!(matches!(modal, CreateModal::Editing(ref m) if m.field_errors.len() == 5));

        modal.editing_mut().unwrap().form = filled();
        assert_eq!(modal.begin_submit(), Some(filled()));
        assert!(modal.is_submitting());

        // A second submit while in flight is ignored
        assert!(modal.begin_submit().is_none());
        modal.cancel();
        assert!(modal.is_submitting());

        modal.submit_failed("duplicate");
        let form = modal.form().unwrap();
        assert_eq!(form.error.as_deref(), Some("duplicate"));
        assert_eq!(form.form, filled());

        assert!(modal.begin_submit().is_some());
        modal.submit_succeeded();
        assert_eq!(modal, CreateModal::Closed);
    }

    #[test]
    fn test_failure_message_fallback() {
        let err = HelpdeskError::Api {
            status: 500,
            message: String::new(),
        };
        assert_eq!(failure_message(&err), CREATE_FAILED_FALLBACK);
        let err = HelpdeskError::Api {
            status: 400,
            message: "client file exists".to_string(),
        };
        assert_eq!(failure_message(&err), "client file exists");
    }
}
