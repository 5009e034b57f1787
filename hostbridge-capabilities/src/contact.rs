use hostbridge_core::{
    bean, encode, wire_enum, ApiGroup, Call, CallMode, Callback, CallbackShape, Capability,
    MethodDescriptor, Param, Result, Returns,
};

bean! {
    /// Identifies a contact in the platform address book.
    pub struct ContactUid as "ContactUid" {
        contact_id: String => "contactId",
    }
}

wire_enum! {
    pub enum ContactPersonalInfoTitle as "ContactPersonalInfoTitle" {
        Mr => "Mr",
        Mrs => "Mrs",
        Ms => "Ms",
        Dr => "Dr",
    }
}

bean! {
    pub struct ContactPersonalInfo as "ContactPersonalInfo" {
        name: String => "name",
        middle_name: String => "middleName",
        last_name: String => "lastName",
        title: ContactPersonalInfoTitle => "title",
    }
}

bean! {
    pub struct ContactProfessionalInfo as "ContactProfessionalInfo" {
        company: String => "company",
        job_title: String => "jobTitle",
        job_description: String => "jobDescription",
    }
}

wire_enum! {
    pub enum ContactEmailType as "ContactEmailType" {
        Personal => "Personal",
        Work => "Work",
        Other => "Other",
    }
}

bean! {
    pub struct ContactEmail as "ContactEmail" {
        email: String => "email",
        primary: bool => "primary",
        email_type: ContactEmailType => "type",
    }
}

wire_enum! {
    pub enum ContactPhoneType as "ContactPhoneType" {
        Mobile => "Mobile",
        Work => "Work",
        Home => "Home",
        Main => "Main",
        HomeFax => "HomeFax",
        WorkFax => "WorkFax",
        Other => "Other",
    }
}

bean! {
    pub struct ContactPhone as "ContactPhone" {
        phone: String => "phone",
        phone_type: ContactPhoneType => "phoneType",
    }
}

bean! {
    /// Free-form key/value label attached to a contact.
    pub struct ContactTag as "ContactTag" {
        tag_name: String => "tagName",
        tag_value: String => "tagValue",
    }
}

bean! {
    pub struct Contact as "Contact" {
        contact_id: String => "contactId",
        personal_info: ContactPersonalInfo => "personalInfo",
        professional_info: ContactProfessionalInfo => "professionalInfo",
        contact_emails: Vec<ContactEmail> => "contactEmails",
        contact_phones: Vec<ContactPhone> => "contactPhones",
        contact_tags: Vec<ContactTag> => "contactTags",
    }
}

wire_enum! {
    /// Sections of a contact a query should fill in.
    pub enum ContactFieldGroup as "IContactFieldGroup" {
        PersonalInfo => "PersonalInfo",
        ProfessionalInfo => "ProfessionalInfo",
        Addresses => "Addresses",
        Phones => "Phones",
        Emails => "Emails",
        Websites => "Websites",
        Socials => "Socials",
        Tags => "Tags",
    }
}

wire_enum! {
    pub enum ContactFilter as "IContactFilter" {
        HasPhone => "HasPhone",
        HasEmail => "HasEmail",
        HasAddress => "HasAddress",
    }
}

wire_enum! {
    pub enum ContactResultWarning as "IContactResultCallbackWarning" {
        LimitExceeded => "LimitExceeded",
        NoMatches => "No_Matches",
    }
}

wire_enum! {
    pub enum ContactResultError as "IContactResultCallbackError" {
        NoPermission => "NoPermission",
        WrongParams => "Wrong_Params",
    }
}

wire_enum! {
    pub enum ContactPhotoWarning as "IContactPhotoResultCallbackWarning" {
        LimitExceeded => "LimitExceeded",
        NoMatches => "No_Matches",
    }
}

wire_enum! {
    pub enum ContactPhotoError as "IContactPhotoResultCallbackError" {
        NoPermission => "NoPermission",
        WrongParams => "Wrong_Params",
        NoPhoto => "No_Photo",
    }
}

/// Delivers a list of contacts.
#[derive(Debug)]
pub struct ContactResultCallback;

impl CallbackShape for ContactResultCallback {
    const NAME: &'static str = "ContactResultCallback";
    type Payload = Vec<Contact>;
    type Warning = ContactResultWarning;
    type Error = ContactResultError;
}

/// Delivers the raw bytes of a contact photo.
#[derive(Debug)]
pub struct ContactPhotoResultCallback;

impl CallbackShape for ContactPhotoResultCallback {
    const NAME: &'static str = "ContactPhotoResultCallback";
    type Payload = Vec<u8>;
    type Warning = ContactPhotoWarning;
    type Error = ContactPhotoError;
}

pub trait ContactDelegate: Send + Sync {
    fn get_contact(&self, contact: ContactUid, callback: Callback<ContactResultCallback>);
    fn get_contact_photo(&self, contact: ContactUid, callback: Callback<ContactPhotoResultCallback>);
    fn get_contacts(&self, callback: Callback<ContactResultCallback>);
    fn get_contacts_for_fields(
        &self,
        fields: Vec<ContactFieldGroup>,
        callback: Callback<ContactResultCallback>,
    );
    fn get_contacts_with_filter(
        &self,
        fields: Vec<ContactFieldGroup>,
        filter: Vec<ContactFilter>,
        callback: Callback<ContactResultCallback>,
    );
    fn search_contacts(&self, term: String, callback: Callback<ContactResultCallback>);
    fn search_contacts_with_filter(
        &self,
        term: String,
        filter: Vec<ContactFilter>,
        callback: Callback<ContactResultCallback>,
    );
    fn set_contact_photo(&self, contact: ContactUid, png_image: Vec<u8>) -> Option<bool>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOp {
    GetContact,
    GetContactPhoto,
    GetContacts,
    GetContactsForFields,
    GetContactsWithFilter,
    SearchContacts,
    SearchContactsWithFilter,
    SetContactPhoto,
}

#[derive(Debug)]
pub struct ContactBridge;

impl Capability for ContactBridge {
    type Delegate = dyn ContactDelegate;
    type Op = ContactOp;

    const BRIDGE: &'static str = "ContactBridge";
    const INTERFACE: &'static str = "IContact";
    const GROUP: ApiGroup = ApiGroup::Pim;
    const METHODS: &'static [MethodDescriptor<ContactOp>] = &[
        MethodDescriptor {
            name: "getContact",
            op: ContactOp::GetContact,
            params: &[Param::new("contact", "ContactUid")],
            mode: CallMode::Callback,
        },
        MethodDescriptor {
            name: "getContactPhoto",
            op: ContactOp::GetContactPhoto,
            params: &[Param::new("contact", "ContactUid")],
            mode: CallMode::Callback,
        },
        MethodDescriptor {
            name: "getContacts",
            op: ContactOp::GetContacts,
            params: &[],
            mode: CallMode::Callback,
        },
        MethodDescriptor {
            name: "getContactsForFields",
            op: ContactOp::GetContactsForFields,
            params: &[Param::new("fields", "[IContactFieldGroup]")],
            mode: CallMode::Callback,
        },
        MethodDescriptor {
            name: "getContactsWithFilter",
            op: ContactOp::GetContactsWithFilter,
            params: &[
                Param::new("fields", "[IContactFieldGroup]"),
                Param::new("filter", "[IContactFilter]"),
            ],
            mode: CallMode::Callback,
        },
        MethodDescriptor {
            name: "searchContacts",
            op: ContactOp::SearchContacts,
            params: &[Param::new("term", "string")],
            mode: CallMode::Callback,
        },
        MethodDescriptor {
            name: "searchContactsWithFilter",
            op: ContactOp::SearchContactsWithFilter,
            params: &[
                Param::new("term", "string"),
                Param::new("filter", "[IContactFilter]"),
            ],
            mode: CallMode::Callback,
        },
        MethodDescriptor {
            name: "setContactPhoto",
            op: ContactOp::SetContactPhoto,
            params: &[
                Param::new("contact", "ContactUid"),
                Param::new("pngImage", "[byte]"),
            ],
            mode: CallMode::Sync(Returns::Bool),
        },
    ];

    fn dispatch(delegate: &Self::Delegate, call: &Call<'_, ContactOp>) -> Result<Option<String>> {
        match call.op() {
            ContactOp::GetContact => {
                let contact = call.param(0)?;
                delegate.get_contact(contact, call.callback()?);
            }
            ContactOp::GetContactPhoto => {
                let contact = call.param(0)?;
                delegate.get_contact_photo(contact, call.callback()?);
            }
            ContactOp::GetContacts => delegate.get_contacts(call.callback()?),
            ContactOp::GetContactsForFields => {
                let fields = call.param(0)?;
                delegate.get_contacts_for_fields(fields, call.callback()?);
            }
            ContactOp::GetContactsWithFilter => {
                let fields = call.param(0)?;
                let filter = call.param(1)?;
                delegate.get_contacts_with_filter(fields, filter, call.callback()?);
            }
            ContactOp::SearchContacts => {
                let term = call.string(0)?;
                delegate.search_contacts(term, call.callback()?);
            }
            ContactOp::SearchContactsWithFilter => {
                let term = call.string(0)?;
                let filter = call.param(1)?;
                delegate.search_contacts_with_filter(term, filter, call.callback()?);
            }
            ContactOp::SetContactPhoto => {
                return Ok(encode(
                    delegate.set_contact_photo(call.param(0)?, call.param(1)?),
                ));
            }
        }
        Ok(None)
    }
}
