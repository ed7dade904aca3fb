pub mod configuration;

pub mod manager {
    pub mod namedobject;
    pub mod managererror;
    pub mod manager;
}

pub mod math {
    pub mod univariatefunction;

    pub mod integration {
        pub mod integrationerror;
        pub mod accuracypolicy;
        pub mod evaluationbudget;
        pub mod univariateintegrator;
        pub mod trapezoidintegrator;
        pub mod simpsonintegrator;
        pub mod rombergintegrator;
        pub mod midpointintegrator;
        pub mod iterativelegendregaussintegrator;
        pub mod integratorgenerator;
        pub mod integratorgeneratormanager;

        pub mod gauss {
            pub mod rule;
            pub mod rulecache;
            pub mod legendrerulegenerator;
            pub mod legendrehighprecisionrulegenerator;
            pub mod hermiterulegenerator;
            pub mod gaussintegrator;
            pub mod gaussintegratorfactory;
        }
    }
}
