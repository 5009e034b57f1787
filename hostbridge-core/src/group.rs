wire_enum! {
    /// Functional area a capability belongs to. Used as the logging category
    /// of every router.
    pub enum ApiGroup as "IAdaptiveRPGroup" {
        Application => "Application",
        Commerce => "Commerce",
        Communication => "Communication",
        Data => "Data",
        Media => "Media",
        Notification => "Notification",
        Pim => "PIM",
        Reader => "Reader",
        Security => "Security",
        Sensor => "Sensor",
        Social => "Social",
        System => "System",
        Ui => "UI",
        Util => "Util",
        Kernel => "Kernel",
    }
}
